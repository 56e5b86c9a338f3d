extern crate nalgebra as na;

pub mod aabb;
pub mod arena;
pub mod camera;
pub mod color;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod gltf_to_scene;
pub mod interpolation;
pub mod intersection;
pub mod program;
pub mod rasterizer;
pub mod rendering;
pub mod scene;
pub mod screenshot;
pub mod shading;
pub mod test_model;
pub mod vertex;

#[cfg(test)]
mod tests;
