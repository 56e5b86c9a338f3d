//! The Cornell box: a room with two blocks, scaled into `[-1, 1]^3`.
//!
//! The back wall sits at z = -1 and the open side faces +z, so a camera at
//! `(0, 0, 3)` looking down -z sees the whole room.

use crate::color::Color;
use crate::geometry::{Fp, Triangle, Vec3f};

const ROOM_SIZE: Fp = 555.0;

pub const RED: Color = Color::new(0.75, 0.15, 0.15);
pub const YELLOW: Color = Color::new(0.75, 0.75, 0.15);
pub const GREEN: Color = Color::new(0.15, 0.75, 0.15);
pub const CYAN: Color = Color::new(0.15, 0.75, 0.75);
pub const BLUE: Color = Color::new(0.15, 0.15, 0.75);
pub const PURPLE: Color = Color::new(0.75, 0.15, 0.75);
pub const WHITE: Color = Color::new(0.75, 0.75, 0.75);

fn to_room_space(x: Fp, y: Fp, z: Fp) -> Vec3f {
    let v = Vec3f::new(x, y, z) / ROOM_SIZE * 2.0 - Vec3f::new(1.0, 1.0, 1.0);
    Vec3f::new(-v.x, v.y, -v.z)
}

/// Corners of an axis-aligned (in plan) box-like solid in the order
/// A B C D on the floor followed by E F G H directly above them.
type Corners = [Vec3f; 8];

fn corners(floor: [(Fp, Fp); 4], height: Fp) -> Corners {
    let mut result = [Vec3f::zeros(); 8];
    for (i, (x, z)) in floor.iter().enumerate() {
        result[i] = to_room_space(*x, 0.0, *z);
        result[i + 4] = to_room_space(*x, height, *z);
    }
    result
}

const A: usize = 0;
const B: usize = 1;
const C: usize = 2;
const D: usize = 3;
const E: usize = 4;
const F: usize = 5;
const G: usize = 6;
const H: usize = 7;

fn faces<'a>(
    corners: &'a Corners,
    indices: &'a [[usize; 3]],
    color: Color,
) -> impl Iterator<Item = Triangle> + 'a {
    indices
        .iter()
        .map(move |[a, b, c]| Triangle::new(corners[*a], corners[*b], corners[*c], color))
}

fn room() -> Vec<Triangle> {
    let room = corners(
        [(ROOM_SIZE, 0.0), (0.0, 0.0), (ROOM_SIZE, ROOM_SIZE), (0.0, ROOM_SIZE)],
        ROOM_SIZE,
    );
    let center = Vec3f::zeros();

    let mut triangles = Vec::with_capacity(10);
    triangles.extend(faces(&room, &[[C, B, A], [C, D, B]], GREEN));
    triangles.extend(faces(&room, &[[A, E, C], [C, E, G]], PURPLE));
    triangles.extend(faces(&room, &[[F, B, D], [H, F, D]], YELLOW));
    triangles.extend(faces(&room, &[[E, F, G], [F, H, G]], CYAN));
    triangles.extend(faces(&room, &[[G, D, C], [G, H, D]], WHITE));
    triangles.into_iter().map(|t| t.facing(&center)).collect()
}

fn block(floor: [(Fp, Fp); 4], height: Fp, color: Color) -> Vec<Triangle> {
    let block = corners(floor, height);
    let center = block.iter().sum::<Vec3f>() / 8.0;
    faces(
        &block,
        &[
            [E, B, A],
            [E, F, B],
            [F, D, B],
            [F, H, D],
            [H, C, D],
            [H, G, C],
            [G, E, C],
            [E, A, C],
            [G, F, E],
            [G, H, F],
        ],
        color,
    )
    .map(|t| t.facing_away_from(&center))
    .collect()
}

pub fn cornell_box() -> Vec<Triangle> {
    let mut triangles = room();
    triangles.extend(block(
        [(290.0, 114.0), (130.0, 65.0), (240.0, 272.0), (82.0, 225.0)],
        165.0,
        RED,
    ));
    triangles.extend(block(
        [(423.0, 247.0), (265.0, 296.0), (472.0, 406.0), (314.0, 456.0)],
        330.0,
        BLUE,
    ));
    triangles
}
