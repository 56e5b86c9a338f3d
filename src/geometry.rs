use nalgebra::{Matrix3, Vector2, Vector3};

pub type Fp = f64;
pub type Vec3f = Vector3<Fp>;
pub type Vec2f = Vector2<Fp>;
pub type Vec2i = Vector2<i32>;

pub static EPS: Fp = 0.00001;
pub static FP_INF: Fp = Fp::INFINITY;

#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Vec3f,
    pub direction: Vec3f,
}

impl Ray {
    pub fn at(&self, t: Fp) -> Vec3f {
        self.origin + self.direction * t
    }
}

/// A flat-shaded world-space triangle.
///
/// The normal is stored rather than derived so that scenes can orient it
/// towards the side that should receive light.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3f,
    pub v1: Vec3f,
    pub v2: Vec3f,
    pub normal: Vec3f,
    pub color: Vec3f,
}

impl Triangle {
    /// Builds a triangle whose normal is `(v2 - v0) x (v1 - v0)`, normalized.
    /// Zero-area triangles get a zero normal.
    pub fn new(v0: Vec3f, v1: Vec3f, v2: Vec3f, color: Vec3f) -> Triangle {
        let normal = (v2 - v0)
            .cross(&(v1 - v0))
            .try_normalize(EPS * EPS)
            .unwrap_or_else(Vec3f::zeros);
        Triangle {
            v0,
            v1,
            v2,
            normal,
            color,
        }
    }

    pub fn with_normal(mut self, normal: Vec3f) -> Triangle {
        self.normal = normal.try_normalize(EPS * EPS).unwrap_or_else(Vec3f::zeros);
        self
    }

    pub fn vertices(&self) -> [Vec3f; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn centroid(&self) -> Vec3f {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Flips the normal if needed so that it points at `point`.
    pub fn facing(mut self, point: &Vec3f) -> Triangle {
        if self.normal.dot(&(point - self.centroid())) < 0.0 {
            self.normal = -self.normal;
        }
        self
    }

    /// Flips the normal if needed so that it points away from `point`.
    pub fn facing_away_from(mut self, point: &Vec3f) -> Triangle {
        if self.normal.dot(&(self.centroid() - point)) < 0.0 {
            self.normal = -self.normal;
        }
        self
    }

    pub fn is_degenerate(&self) -> bool {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0)).norm() < EPS * EPS
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub position: Vec3f,
    pub distance: Fp,
    pub triangle_index: usize,
}

/// Solves `origin + t * dir = v0 + u * e1 + v * e2` and returns `(t, u, v)`.
///
/// Returns `None` when the ray is parallel to the triangle plane (singular
/// system) or the solution lies outside the triangle or behind the origin.
pub fn intersect_ray_with_triangle(ray: &Ray, triangle: &Triangle) -> Option<(Fp, Fp, Fp)> {
    let e1 = triangle.v1 - triangle.v0;
    let e2 = triangle.v2 - triangle.v0;
    let b = ray.origin - triangle.v0;
    let a = Matrix3::from_columns(&[-ray.direction, e1, e2]);
    if a.determinant().abs() < EPS * EPS * EPS {
        return None;
    }
    let x = a.lu().solve(&b)?;
    let (t, u, v) = (x[0], x[1], x[2]);
    if u >= 0.0 && v >= 0.0 && u + v <= 1.0 && t >= 0.0 {
        Some((t, u, v))
    } else {
        None
    }
}

pub fn closest_intersection(ray: &Ray, triangles: &[Triangle]) -> Option<Hit> {
    closest_intersection_excluding(ray, triangles, None)
}

/// Like [`closest_intersection`], ignoring the triangle at `excluded`.
///
/// Shadow rays skip the triangle the fragment lies on: a planar triangle can
/// never occlude its own points, but rounding can make it look like it does.
pub fn closest_intersection_excluding(
    ray: &Ray,
    triangles: &[Triangle],
    excluded: Option<usize>,
) -> Option<Hit> {
    triangles
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != excluded)
        .filter_map(|(index, triangle)| {
            intersect_ray_with_triangle(ray, triangle).map(|(t, _, _)| (t, index))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(t, triangle_index)| Hit {
            position: ray.at(t),
            distance: t,
            triangle_index,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle(y: Fp) -> Triangle {
        Triangle::new(
            Vec3f::new(-1.0, y, -1.0),
            Vec3f::new(1.0, y, -1.0),
            Vec3f::new(-1.0, y, 1.0),
            Vec3f::new(1.0, 1.0, 1.0),
        )
    }

    #[test]
    fn test_ray_hits_triangle_from_above() {
        let ray = Ray {
            origin: Vec3f::new(-0.5, 2.0, -0.5),
            direction: Vec3f::new(0.0, -1.0, 0.0),
        };
        let (t, u, v) = intersect_ray_with_triangle(&ray, &floor_triangle(0.0)).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-9);
        assert_relative_eq!(u, 0.25, epsilon = 1e-9);
        assert_relative_eq!(v, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_ray_parallel_to_triangle_is_a_miss() {
        let ray = Ray {
            origin: Vec3f::new(-2.0, 0.0, -0.5),
            direction: Vec3f::new(1.0, 0.0, 0.0),
        };
        assert!(intersect_ray_with_triangle(&ray, &floor_triangle(0.0)).is_none());
    }

    #[test]
    fn test_hit_behind_origin_is_ignored() {
        let ray = Ray {
            origin: Vec3f::new(-0.5, 2.0, -0.5),
            direction: Vec3f::new(0.0, 1.0, 0.0),
        };
        assert!(intersect_ray_with_triangle(&ray, &floor_triangle(0.0)).is_none());
    }

    #[test]
    fn test_closest_intersection_picks_nearest() {
        let triangles = vec![floor_triangle(-1.0), floor_triangle(0.5), floor_triangle(0.0)];
        let ray = Ray {
            origin: Vec3f::new(-0.5, 2.0, -0.5),
            direction: Vec3f::new(0.0, -1.0, 0.0),
        };
        let hit = closest_intersection(&ray, &triangles).unwrap();
        assert_eq!(hit.triangle_index, 1);
        assert_relative_eq!(hit.distance, 1.5, epsilon = 1e-9);
        assert_relative_eq!(hit.position, Vec3f::new(-0.5, 0.5, -0.5), epsilon = 1e-9);

        let hit = closest_intersection_excluding(&ray, &triangles, Some(1)).unwrap();
        assert_eq!(hit.triangle_index, 2);
    }

    #[test]
    fn test_normal_orientation_helpers() {
        let triangle = floor_triangle(0.0);
        let above = Vec3f::new(0.0, 5.0, 0.0);
        assert!(triangle.clone().facing(&above).normal.y > 0.0);
        assert!(triangle.facing_away_from(&above).normal.y < 0.0);
    }

    #[test]
    fn test_point_triangle_is_degenerate() {
        let p = Vec3f::new(1.0, 2.0, 3.0);
        let triangle = Triangle::new(p, p, p, Vec3f::zeros());
        assert!(triangle.is_degenerate());
        assert_eq!(triangle.normal, Vec3f::zeros());
    }
}
