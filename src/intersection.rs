//! 2D segment intersection and clipping in raster space.

use arrayvec::ArrayVec;

use crate::aabb::Aabb;
use crate::geometry::{Fp, Vec2i};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntersectionKind {
    Intersection,
    Collinear,
    ParallelNonIntersection,
    NonParallelNonIntersection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineIntersection {
    pub point: Vec2i,
    pub kind: IntersectionKind,
}

impl LineIntersection {
    fn miss(kind: IntersectionKind) -> LineIntersection {
        LineIntersection {
            point: Vec2i::zeros(),
            kind,
        }
    }
}

fn cross(a: &Vec2i, b: &Vec2i) -> i64 {
    a.x as i64 * b.y as i64 - a.y as i64 * b.x as i64
}

/// Intersects segment `p_start -> p_stop` with segment `q_start -> q_stop`.
///
/// Solves `p + t r = q + u s` with 2D cross products. The point is only
/// meaningful for [`IntersectionKind::Intersection`] and is rounded to the
/// nearest raster coordinate.
pub fn line_line_intersection(
    p_start: &Vec2i,
    p_stop: &Vec2i,
    q_start: &Vec2i,
    q_stop: &Vec2i,
) -> LineIntersection {
    let r = p_stop - p_start;
    let s = q_stop - q_start;
    let q_minus_p = q_start - p_start;

    let divisor = cross(&r, &s);
    let dividend = cross(&q_minus_p, &s);

    if divisor == 0 {
        return if dividend == 0 {
            LineIntersection::miss(IntersectionKind::Collinear)
        } else {
            LineIntersection::miss(IntersectionKind::ParallelNonIntersection)
        };
    }

    let t = dividend as Fp / divisor as Fp;
    let u = cross(&q_minus_p, &r) as Fp / divisor as Fp;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        let point = Vec2i::new(
            p_start.x + (t * r.x as Fp).round() as i32,
            p_start.y + (t * r.y as Fp).round() as i32,
        );
        LineIntersection {
            point,
            kind: IntersectionKind::Intersection,
        }
    } else {
        LineIntersection::miss(IntersectionKind::NonParallelNonIntersection)
    }
}

/// Crossings of a segment with the border of `rectangle`.
///
/// The border runs through the outermost pixels of the half-open rectangle,
/// i.e. `right - 1` and `bottom - 1`. Edges are tested left, top, right,
/// bottom; collinear and parallel edges never contribute a point. A segment
/// passing exactly through a corner reports that corner once per edge it
/// touches, and at most two points are kept.
pub fn line_rect_intersection(rectangle: &Aabb, start: &Vec2i, stop: &Vec2i) -> ArrayVec<Vec2i, 2> {
    let top_left = Vec2i::new(rectangle.left, rectangle.top);
    let top_right = Vec2i::new(rectangle.right - 1, rectangle.top);
    let bottom_left = Vec2i::new(rectangle.left, rectangle.bottom - 1);
    let bottom_right = Vec2i::new(rectangle.right - 1, rectangle.bottom - 1);

    let edges = [
        (top_left, bottom_left),
        (top_left, top_right),
        (bottom_right, top_right),
        (bottom_right, bottom_left),
    ];

    let mut result = ArrayVec::<Vec2i, 2>::new();
    for (edge_start, edge_stop) in &edges {
        let intersection = line_line_intersection(start, stop, edge_start, edge_stop);
        if intersection.kind == IntersectionKind::Intersection && !result.is_full() {
            result.push(intersection.point);
        }
    }
    result
}

const INSIDE: u8 = 0b0000;
const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BOTTOM: u8 = 0b0100;
const TOP: u8 = 0b1000;

fn out_code(viewport: &Aabb, v: &Vec2i) -> u8 {
    let mut code = INSIDE;
    if v.x < viewport.left {
        code |= LEFT;
    } else if v.x >= viewport.right {
        code |= RIGHT;
    }
    if v.y < viewport.top {
        code |= TOP;
    } else if v.y >= viewport.bottom {
        code |= BOTTOM;
    }
    code
}

// The outcode bit tested in each branch guarantees a non-zero denominator.
fn clip_point(viewport: &Aabb, code: u8, v0: &Vec2i, v1: &Vec2i) -> Vec2i {
    let (x0, y0) = (v0.x as Fp, v0.y as Fp);
    let (dx, dy) = ((v1.x - v0.x) as Fp, (v1.y - v0.y) as Fp);
    if code & TOP != 0 {
        let x = x0 + dx * (viewport.top as Fp - y0) / dy;
        Vec2i::new(x.round() as i32, viewport.top)
    } else if code & BOTTOM != 0 {
        let y = viewport.bottom - 1;
        let x = x0 + dx * (y as Fp - y0) / dy;
        Vec2i::new(x.round() as i32, y)
    } else if code & RIGHT != 0 {
        let x = viewport.right - 1;
        let y = y0 + dy * (x as Fp - x0) / dx;
        Vec2i::new(x, y.round() as i32)
    } else {
        let y = y0 + dy * (viewport.left as Fp - x0) / dx;
        Vec2i::new(viewport.left, y.round() as i32)
    }
}

/// Cohen–Sutherland clipping of the segment `v0 -> v1` against `viewport`.
///
/// Returns whether any part of the segment is visible; when it is, `v0` and
/// `v1` are moved onto the visible part. On rejection the endpoints may have
/// been partially clipped and should be ignored.
pub fn cohen_sutherland_line_clip(viewport: &Aabb, v0: &mut Vec2i, v1: &mut Vec2i) -> bool {
    if viewport.is_empty() {
        return false;
    }
    let mut code_v0 = out_code(viewport, v0);
    let mut code_v1 = out_code(viewport, v1);

    // Each endpoint needs at most one clip per axis; rounding can add one more.
    for _ in 0..8 {
        if code_v0 | code_v1 == INSIDE {
            return true;
        }
        if code_v0 & code_v1 != 0 {
            return false;
        }
        if code_v0 != INSIDE {
            *v0 = clip_point(viewport, code_v0, v0, v1);
            code_v0 = out_code(viewport, v0);
        } else {
            *v1 = clip_point(viewport, code_v1, v0, v1);
            code_v1 = out_code(viewport, v1);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> Vec2i {
        Vec2i::new(x, y)
    }

    #[test]
    fn test_crossing_diagonals() {
        let result = line_line_intersection(&v(0, 0), &v(100, 100), &v(100, 0), &v(0, 100));
        assert_eq!(result.kind, IntersectionKind::Intersection);
        assert_eq!(result.point, v(50, 50));
    }

    #[test]
    fn test_crossing_near_the_border() {
        // Meets the vertical line x = 399 close to its far end.
        let result = line_line_intersection(&v(266, 266), &v(400, 0), &v(399, 399), &v(399, 0));
        assert_eq!(result.kind, IntersectionKind::Intersection);
        assert_eq!(result.point, v(399, 2));
    }

    #[test]
    fn test_touching_endpoints_intersect() {
        let result = line_line_intersection(&v(133, 266), &v(400, 400), &v(400, 400), &v(0, 400));
        assert_eq!(result.kind, IntersectionKind::Intersection);
        assert_eq!(result.point, v(400, 400));
    }

    #[test]
    fn test_collinear() {
        let result = line_line_intersection(&v(0, 0), &v(100, 100), &v(0, 0), &v(100, 100));
        assert_eq!(result.kind, IntersectionKind::Collinear);
    }

    #[test]
    fn test_parallel() {
        let result = line_line_intersection(&v(0, 0), &v(0, 100), &v(10, 0), &v(10, 100));
        assert_eq!(result.kind, IntersectionKind::ParallelNonIntersection);

        let result = line_line_intersection(&v(400, 400), &v(0, 400), &v(399, 399), &v(0, 399));
        assert_eq!(result.kind, IntersectionKind::ParallelNonIntersection);
    }

    #[test]
    fn test_non_parallel_miss() {
        let result = line_line_intersection(&v(0, 0), &v(50, 50), &v(0, 100), &v(100, 100));
        assert_eq!(result.kind, IntersectionKind::NonParallelNonIntersection);

        let result = line_line_intersection(&v(400, 400), &v(0, 400), &v(399, 399), &v(399, 0));
        assert_eq!(result.kind, IntersectionKind::NonParallelNonIntersection);
    }

    #[test]
    fn test_line_rect_intersection() {
        let rectangle = Aabb::new(0, 0, 400, 400);

        let diagonal = line_rect_intersection(&rectangle, &v(50, 50), &v(405, 405));
        assert_eq!(diagonal[0], v(399, 399));

        let backwards = line_rect_intersection(&rectangle, &v(405, 405), &v(50, 50));
        assert_eq!(backwards[0], v(399, 399));

        let vertical = line_rect_intersection(&rectangle, &v(50, 50), &v(50, 500));
        assert_eq!(vertical.as_slice(), &[v(50, 399)]);

        let horizontal = line_rect_intersection(&rectangle, &v(50, 50), &v(500, 50));
        assert_eq!(horizontal.as_slice(), &[v(399, 50)]);

        let angled = line_rect_intersection(&rectangle, &v(159, 23), &v(-35, 504));
        assert_eq!(angled.as_slice(), &[v(7, 399)]);
    }

    #[test]
    fn test_line_rect_no_intersection() {
        let rectangle = Aabb::new(0, 0, 400, 400);
        assert!(line_rect_intersection(&rectangle, &v(50, 50), &v(2, 2)).is_empty());
        assert!(line_rect_intersection(&rectangle, &v(33, 150), &v(235, 50)).is_empty());
    }

    #[test]
    fn test_line_rect_two_crossings() {
        let rectangle = Aabb::new(0, 0, 400, 400);
        let result = line_rect_intersection(&rectangle, &v(-50, 200), &v(450, 200));
        assert_eq!(result.as_slice(), &[v(0, 200), v(399, 200)]);
    }

    #[test]
    fn test_clip_accepts_inside_segment_unchanged() {
        let viewport = Aabb::new(0, 0, 100, 100);
        let (mut a, mut b) = (v(10, 10), v(90, 50));
        assert!(cohen_sutherland_line_clip(&viewport, &mut a, &mut b));
        assert_eq!((a, b), (v(10, 10), v(90, 50)));
    }

    #[test]
    fn test_clip_rejects_segment_on_one_side() {
        let viewport = Aabb::new(0, 0, 100, 100);
        let (mut a, mut b) = (v(-10, 10), v(-5, 90));
        assert!(!cohen_sutherland_line_clip(&viewport, &mut a, &mut b));
    }

    #[test]
    fn test_clip_moves_endpoints_onto_border() {
        let viewport = Aabb::new(0, 0, 100, 100);
        let (mut a, mut b) = (v(-50, 50), v(150, 50));
        assert!(cohen_sutherland_line_clip(&viewport, &mut a, &mut b));
        assert_eq!((a, b), (v(0, 50), v(99, 50)));

        let (mut a, mut b) = (v(50, -20), v(50, 300));
        assert!(cohen_sutherland_line_clip(&viewport, &mut a, &mut b));
        assert_eq!((a, b), (v(50, 0), v(50, 99)));
    }

    #[test]
    fn test_clip_diagonal_through_corner_region() {
        let viewport = Aabb::new(0, 0, 100, 100);
        let (mut a, mut b) = (v(-20, -20), v(120, 120));
        assert!(cohen_sutherland_line_clip(&viewport, &mut a, &mut b));
        assert!(viewport.contains(&a) && viewport.contains(&b));
        assert_eq!(a, v(0, 0));
        assert_eq!(b, v(99, 99));
    }

    #[test]
    fn test_clip_rejects_segment_missing_corner() {
        let viewport = Aabb::new(0, 0, 100, 100);
        let (mut a, mut b) = (v(-50, 40), v(40, -50));
        assert!(!cohen_sutherland_line_clip(&viewport, &mut a, &mut b));
    }
}
