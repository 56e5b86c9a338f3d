use nalgebra::Vector3;

use crate::geometry::{Fp, Vec2f, Vec2i, Vec3f, EPS};

/// Values that can be mixed with three scalar weights.
///
/// Integer types round to the nearest value after mixing.
pub trait Interpolate: Copy {
    fn blend(values: [Self; 3], weights: &Vector3<Fp>) -> Self;

    fn lerp(start: Self, stop: Self, fraction: Fp) -> Self {
        Self::blend([start, stop, start], &Vector3::new(1.0 - fraction, fraction, 0.0))
    }
}

impl Interpolate for Fp {
    fn blend(values: [Fp; 3], weights: &Vector3<Fp>) -> Fp {
        values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
    }
}

impl Interpolate for i32 {
    fn blend(values: [i32; 3], weights: &Vector3<Fp>) -> i32 {
        Fp::blend(values.map(|v| v as Fp), weights).round() as i32
    }
}

impl Interpolate for Vec3f {
    fn blend(values: [Vec3f; 3], weights: &Vector3<Fp>) -> Vec3f {
        values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
    }
}

impl Interpolate for Vec2i {
    fn blend(values: [Vec2i; 3], weights: &Vector3<Fp>) -> Vec2i {
        Vec2i::new(
            i32::blend(values.map(|v| v.x), weights),
            i32::blend(values.map(|v| v.y), weights),
        )
    }
}

impl<A: Interpolate, B: Interpolate> Interpolate for (A, B) {
    fn blend(values: [(A, B); 3], weights: &Vector3<Fp>) -> (A, B) {
        (
            A::blend(values.map(|v| v.0), weights),
            B::blend(values.map(|v| v.1), weights),
        )
    }
}

/// `samples` evenly spaced values from `start` to `stop`, both included.
pub fn interpolate<T: Interpolate>(start: T, stop: T, samples: usize) -> Vec<T> {
    match samples {
        0 => vec![],
        1 => vec![start],
        _ => {
            let last = (samples - 1) as Fp;
            (0..samples)
                .map(|i| T::lerp(start, stop, i as Fp / last))
                .collect()
        }
    }
}

pub fn edge(a: &Vec2f, b: &Vec2f, p: &Vec2f) -> Fp {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Normalized barycentric weights of `p` in triangle `(a, b, c)`.
///
/// The weights sum to one; all are non-negative inside the triangle. Returns
/// `None` for zero-area triangles.
pub fn barycentric_weights(p: &Vec2f, a: &Vec2f, b: &Vec2f, c: &Vec2f) -> Option<Vector3<Fp>> {
    let area = edge(a, b, c);
    if area.abs() < EPS {
        return None;
    }
    Some(Vector3::new(
        edge(b, c, p) / area,
        edge(c, a, p) / area,
        edge(a, b, p) / area,
    ))
}

pub fn interpolate_barycentric<T: Interpolate>(
    p: &Vec2f,
    corners: [Vec2f; 3],
    attributes: [T; 3],
) -> Option<T> {
    let weights = barycentric_weights(p, &corners[0], &corners[1], &corners[2])?;
    Some(T::blend(attributes, &weights))
}
