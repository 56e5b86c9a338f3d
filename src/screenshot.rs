//! Writing finished color buffers to disk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::color::{linear_to_srgb, pack_bgra, to_bytes, Color};
use crate::framebuffer::Buffer2D;

const BMP_FILE_HEADER_SIZE: u32 = 14;
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Binary PPM with linear channels, as raw bytes.
pub fn write_ppm(out: &mut impl Write, color: &Buffer2D<Color>) -> io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", color.width(), color.height())?;
    for pixel in color.as_slice() {
        out.write_all(&to_bytes(pixel))?;
    }
    Ok(())
}

/// Uncompressed 32 bpp BMP with top-down rows (negative height). Pixels are
/// stored as little-endian BGRA.
pub fn write_bmp(out: &mut impl Write, color: &Buffer2D<Color>) -> io::Result<()> {
    let width = color.width() as u32;
    let height = color.height() as u32;
    let offset = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE;
    let image_size = width * height * 4;

    out.write_all(&0x4D42u16.to_le_bytes())?;
    out.write_all(&(offset + image_size).to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;
    out.write_all(&offset.to_le_bytes())?;

    out.write_all(&BMP_INFO_HEADER_SIZE.to_le_bytes())?;
    out.write_all(&(width as i32).to_le_bytes())?;
    out.write_all(&(-(height as i32)).to_le_bytes())?;
    out.write_all(&1u16.to_le_bytes())?;
    out.write_all(&32u16.to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;
    out.write_all(&image_size.to_le_bytes())?;
    out.write_all(&0i32.to_le_bytes())?;
    out.write_all(&0i32.to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;

    for pixel in color.as_slice() {
        out.write_all(&pack_bgra(&linear_to_srgb(pixel), 1.0).to_le_bytes())?;
    }
    Ok(())
}

pub fn save_ppm(path: &Path, color: &Buffer2D<Color>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm(&mut out, color)?;
    out.flush()
}

pub fn save_bmp(path: &Path, color: &Buffer2D<Color>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_bmp(&mut out, color)?;
    out.flush()
}

pub fn to_rgb_image(color: &Buffer2D<Color>) -> RgbImage {
    let mut img = RgbImage::new(color.width() as u32, color.height() as u32);
    for (pixel, value) in img.pixels_mut().zip(color.as_slice()) {
        pixel.0 = to_bytes(&linear_to_srgb(value));
    }
    img
}

pub fn save_png(path: &Path, color: &Buffer2D<Color>) -> image::ImageResult<()> {
    to_rgb_image(color).save_with_format(path, ImageFormat::Png)
}
