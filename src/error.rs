use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::Fp;

/// Errors that stop a frame before any pixel is written.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("device aspect ratio {device} does not match film aspect ratio {film}")]
    AspectRatioMismatch { device: Fp, film: Fp },

    #[error("camera parameter `{name}` must be finite and positive, got {value}")]
    InvalidCameraParameter { name: &'static str, value: Fp },

    #[error("clip planes must satisfy 0 < near < far, got near = {near}, far = {far}")]
    InvalidClipPlanes { near: Fp, far: Fp },

    #[error("viewport {width}x{height} has no pixels")]
    EmptyViewport { width: i32, height: i32 },
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: `{command}` expects {expected} arguments, got {found}")]
    ArgumentCount {
        line: usize,
        command: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: `{token}` is not a valid number")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: `{command}` must follow NEW_TRIANGLE")]
    NoCurrentTriangle { line: usize, command: String },

    #[error("line {line}: triangle has no TRIANGLE vertices")]
    MissingVertices { line: usize },

    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid camera: {0}")]
    Camera(#[from] RenderError),

    #[error("failed to import mesh {}: {source}", .path.display())]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("mesh {}: {message}", .path.display())]
    UnsupportedMesh { path: PathBuf, message: String },
}
