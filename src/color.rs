use crate::geometry::{Fp, Vec3f};

/// Linear RGB, nominally in `[0, 1]` per channel.
pub type Color = Vec3f;

pub fn clamp(color: &Color) -> Color {
    color.map(|c| c.clamp(0.0, 1.0))
}

fn linear_to_srgb_channel(c: Fp) -> Fp {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

pub fn linear_to_srgb(color: &Color) -> Color {
    color.map(linear_to_srgb_channel)
}

pub fn to_byte(c: Fp) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

pub fn to_bytes(color: &Color) -> [u8; 3] {
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// `0xAABBGGRR`, i.e. bytes R, G, B, A in little-endian memory order.
pub fn pack_rgba(color: &Color, alpha: Fp) -> u32 {
    let [r, g, b] = to_bytes(color);
    (to_byte(alpha) as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32
}

/// `0xAARRGGBB`, i.e. bytes B, G, R, A in little-endian memory order.
pub fn pack_bgra(color: &Color, alpha: Fp) -> u32 {
    let [r, g, b] = to_bytes(color);
    (to_byte(alpha) as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}
