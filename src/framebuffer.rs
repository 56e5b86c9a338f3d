use crate::color::Color;
use crate::geometry::{Fp, Vec2i, FP_INF};
use crate::rasterizer::Fragment;

/// Row-major 2D grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Buffer2D<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Clone> Buffer2D<T> {
    pub fn new(width: usize, height: usize, value: T) -> Buffer2D<T> {
        Buffer2D {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Buffer2D<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, position: &Vec2i) -> Option<usize> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, position: &Vec2i) -> Option<&T> {
        self.index(position).map(|i| &self.data[i])
    }

    pub fn get_mut(&mut self, position: &Vec2i) -> Option<&mut T> {
        self.index(position).map(move |i| &mut self.data[i])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width.max(1))
    }
}

#[derive(Clone, Debug)]
pub struct FrameBuffers {
    pub depth: Buffer2D<Fp>,
    pub color: Buffer2D<Color>,
}

impl FrameBuffers {
    pub fn new(width: usize, height: usize) -> FrameBuffers {
        FrameBuffers {
            depth: Buffer2D::new(width, height, FP_INF),
            color: Buffer2D::new(width, height, Color::zeros()),
        }
    }

    pub fn width(&self) -> usize {
        self.color.width()
    }

    pub fn height(&self) -> usize {
        self.color.height()
    }

    pub fn reset(&mut self, far: Fp, background: Color) {
        self.depth.fill(far);
        self.color.fill(background);
    }

    /// Depth test: keeps `fragment` if it is strictly nearer than what the
    /// pixel holds, and only then calls `shade`. Equal depths keep the
    /// earlier fragment. Fragments outside the buffers are discarded.
    pub fn composite(&mut self, fragment: &Fragment, shade: impl FnOnce(&Fragment) -> Color) -> bool {
        let Some(depth) = self.depth.get_mut(&fragment.position) else {
            return false;
        };
        if !(fragment.depth < *depth) {
            return false;
        }
        *depth = fragment.depth;
        if let Some(color) = self.color.get_mut(&fragment.position) {
            *color = shade(fragment);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3f;
    use nalgebra::Vector3;

    fn fragment(x: i32, y: i32, depth: Fp) -> Fragment {
        Fragment {
            position: Vec2i::new(x, y),
            depth,
            barycentric: Vector3::new(1.0, 0.0, 0.0),
            world_position: Vec3f::zeros(),
        }
    }

    #[test]
    fn test_nearer_fragment_wins_in_any_order() {
        let red = Color::new(1.0, 0.0, 0.0);
        let blue = Color::new(0.0, 0.0, 1.0);
        let near = fragment(1, 1, 2.0);
        let far = fragment(1, 1, 5.0);

        let mut buffers = FrameBuffers::new(4, 4);
        buffers.reset(100.0, Color::zeros());
        assert!(buffers.composite(&far, |_| blue));
        assert!(buffers.composite(&near, |_| red));
        assert_eq!(buffers.color.get(&Vec2i::new(1, 1)), Some(&red));

        buffers.reset(100.0, Color::zeros());
        assert!(buffers.composite(&near, |_| red));
        assert!(!buffers.composite(&far, |_| blue));
        assert_eq!(buffers.color.get(&Vec2i::new(1, 1)), Some(&red));
        assert_eq!(buffers.depth.get(&Vec2i::new(1, 1)), Some(&2.0));
    }

    #[test]
    fn test_rejected_fragment_is_not_shaded() {
        let mut buffers = FrameBuffers::new(2, 2);
        buffers.reset(10.0, Color::zeros());
        let mut shaded = false;
        assert!(!buffers.composite(&fragment(0, 0, 10.0), |_| {
            shaded = true;
            Color::zeros()
        }));
        assert!(!shaded);
    }

    #[test]
    fn test_out_of_bounds_fragment_is_discarded() {
        let mut buffers = FrameBuffers::new(2, 2);
        buffers.reset(10.0, Color::zeros());
        assert!(!buffers.composite(&fragment(2, 0, 1.0), |_| Color::zeros()));
        assert!(!buffers.composite(&fragment(0, -1, 1.0), |_| Color::zeros()));
    }

    #[test]
    fn test_reset_restores_background() {
        let background = Color::new(0.2, 0.3, 0.4);
        let mut buffers = FrameBuffers::new(3, 2);
        buffers.composite(&fragment(2, 1, 1.0), |_| Color::new(1.0, 1.0, 1.0));
        buffers.reset(50.0, background);
        assert!(buffers.color.as_slice().iter().all(|c| *c == background));
        assert!(buffers.depth.as_slice().iter().all(|d| *d == 50.0));
        assert_eq!(buffers.color.rows().count(), 2);
    }
}
