use std::f64::consts::PI;

use crate::color::{clamp, Color};
use crate::geometry::{closest_intersection_excluding, Fp, Ray, Triangle, Vec3f, EPS};

/// Offset applied to shadow ray origins along the direction to the light.
pub const SHADOW_BIAS: Fp = 1e-4;

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3f,
    pub color: Color,
    pub ambient: Color,
}

impl Default for Light {
    fn default() -> Self {
        Light {
            position: Vec3f::new(0.0, 0.5, 0.7),
            color: Color::new(1.0, 1.0, 1.0) * 14.0,
            ambient: Color::new(1.0, 1.0, 1.0) * 0.5,
        }
    }
}

/// Irradiance reaching `position` from `light`, ignoring occluders.
pub fn direct_light(position: &Vec3f, normal: &Vec3f, light: &Light) -> Color {
    let to_light = light.position - position;
    let radius_squared = to_light.norm_squared();
    if radius_squared < EPS * EPS {
        return Color::zeros();
    }
    let cosine = normal.dot(&to_light.normalize()).max(0.0);
    light.color * (cosine / (4.0 * PI * radius_squared))
}

/// Whether something sits between `position` and the light.
///
/// The triangle at `own_triangle` is never considered an occluder.
pub fn in_shadow(position: &Vec3f, own_triangle: usize, triangles: &[Triangle], light: &Light) -> bool {
    let to_light = light.position - position;
    let distance = to_light.norm();
    if distance <= SHADOW_BIAS {
        return false;
    }
    let direction = to_light / distance;
    let ray = Ray {
        origin: position + direction * SHADOW_BIAS,
        direction,
    };
    closest_intersection_excluding(&ray, triangles, Some(own_triangle))
        .is_some_and(|hit| hit.distance < distance - SHADOW_BIAS)
}

/// Color of a point on `triangles[triangle_index]`.
///
/// Lit points get `color * (direct + ambient)`; shadowed points only get the
/// ambient part. The result is clamped to `[0, 1]`.
pub fn shade(position: &Vec3f, triangle_index: usize, triangles: &[Triangle], light: &Light) -> Color {
    let Some(triangle) = triangles.get(triangle_index) else {
        return Color::zeros();
    };
    let ambient = triangle.color.component_mul(&light.ambient);
    if in_shadow(position, triangle_index, triangles, light) {
        return clamp(&ambient);
    }
    let direct = triangle
        .color
        .component_mul(&direct_light(position, &triangle.normal, light));
    clamp(&(direct + ambient))
}
