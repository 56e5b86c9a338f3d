//! Bounding-box triangle scan with edge functions.
//!
//! Winding is clockwise-negative in raster space (x right, y down): a pixel is
//! covered when all three edge functions are `<= 0`, so pixels exactly on an
//! edge belong to the triangle. Callers hand over triangles whose signed area
//! is negative; [`clockwise`] reorders the other ones.

use nalgebra::Vector3;

use crate::aabb::{bounding_box, Viewport};
use crate::geometry::{Fp, Vec2i, Vec3f};
use crate::vertex::RasterVertex;

#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub position: Vec2i,
    pub depth: Fp,
    /// Perspective-correct weights of the three vertices; they sum to one.
    pub barycentric: Vector3<Fp>,
    pub world_position: Vec3f,
}

/// `(p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)`, exact in `i64`.
pub fn edge_function(a: &Vec2i, b: &Vec2i, p: &Vec2i) -> i64 {
    let (ax, ay) = (a.x as i64, a.y as i64);
    (p.x as i64 - ax) * (b.y as i64 - ay) - (p.y as i64 - ay) * (b.x as i64 - ax)
}

pub fn signed_area(vertices: &[RasterVertex; 3]) -> i64 {
    edge_function(&vertices[0].position, &vertices[1].position, &vertices[2].position)
}

pub fn clockwise(mut vertices: [RasterVertex; 3]) -> [RasterVertex; 3] {
    if signed_area(&vertices) > 0 {
        vertices.swap(1, 2);
    }
    vertices
}

/// Calls `emit` for every covered pixel inside `viewport` and returns how many
/// fragments were produced.
///
/// Nothing is visited when the clamped bounding box is empty, when the area is
/// zero or counter-clockwise, or when a depth is not positive.
pub fn for_each_fragment(
    viewport: &Viewport,
    vertices: &[RasterVertex; 3],
    mut emit: impl FnMut(Fragment),
) -> usize {
    let [v0, v1, v2] = vertices;
    if [v0.depth, v1.depth, v2.depth].iter().any(|depth| !(*depth > 0.0)) {
        return 0;
    }

    let area = signed_area(vertices);
    if area >= 0 {
        return 0;
    }

    let aabb = bounding_box(&v0.position, &v1.position, &v2.position).intersection(viewport);
    if aabb.is_empty() {
        return 0;
    }

    let area = area as Fp;
    let inverse_depth = Vector3::new(1.0 / v0.depth, 1.0 / v1.depth, 1.0 / v2.depth);
    let mut count = 0;

    for y in aabb.top..aabb.bottom {
        for x in aabb.left..aabb.right {
            let p = Vec2i::new(x, y);
            let w0 = edge_function(&v1.position, &v2.position, &p);
            let w1 = edge_function(&v2.position, &v0.position, &p);
            let w2 = edge_function(&v0.position, &v1.position, &p);
            if w0 > 0 || w1 > 0 || w2 > 0 {
                continue;
            }

            let weights = Vector3::new(w0 as Fp / area, w1 as Fp / area, w2 as Fp / area);
            let scaled = weights.component_mul(&inverse_depth);
            let depth = 1.0 / scaled.sum();
            let barycentric = scaled * depth;
            let world_position = v0.world_position * barycentric.x
                + v1.world_position * barycentric.y
                + v2.world_position * barycentric.z;

            emit(Fragment {
                position: p,
                depth,
                barycentric,
                world_position,
            });
            count += 1;
        }
    }
    count
}

pub fn rasterize(viewport: &Viewport, vertices: &[RasterVertex; 3]) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for_each_fragment(viewport, vertices, |fragment| fragments.push(fragment));
    fragments
}
