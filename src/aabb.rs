use crate::geometry::Vec2i;

/// Integer axis-aligned box in raster space.
///
/// All boxes are half-open: `left <= x < right` and `top <= y < bottom`.
/// The viewport, triangle bounding boxes and the clipping utilities share this
/// convention, so a box with `left == right` covers no pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aabb {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

pub type Viewport = Aabb;

impl Aabb {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Aabb {
        Aabb {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(width: i32, height: i32) -> Aabb {
        Aabb::new(0, 0, width, height)
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, point: &Vec2i) -> bool {
        self.left <= point.x && point.x < self.right && self.top <= point.y && point.y < self.bottom
    }

    pub fn is_completely_outside_of(&self, area: &Aabb) -> bool {
        self.right <= area.left
            || self.left >= area.right
            || self.bottom <= area.top
            || self.top >= area.bottom
    }

    pub fn is_completely_inside_of(&self, area: &Aabb) -> bool {
        self.left >= area.left
            && self.right <= area.right
            && self.top >= area.top
            && self.bottom <= area.bottom
    }

    /// The overlap of two boxes; empty (but well formed) when they are disjoint.
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        Aabb {
            left,
            top,
            right: self.right.min(other.right).max(left),
            bottom: self.bottom.min(other.bottom).max(top),
        }
    }
}

/// Smallest box covering the three points. Right/bottom are one past the
/// largest coordinate so the result agrees with [`Aabb::contains`].
pub fn bounding_box(v0: &Vec2i, v1: &Vec2i, v2: &Vec2i) -> Aabb {
    Aabb {
        left: v0.x.min(v1.x).min(v2.x),
        top: v0.y.min(v1.y).min(v2.y),
        right: v0.x.max(v1.x).max(v2.x).saturating_add(1),
        bottom: v0.y.max(v1.y).max(v2.y).saturating_add(1),
    }
}
