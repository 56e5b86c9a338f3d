use nalgebra::Matrix3;

use crate::aabb::Viewport;
use crate::camera::Camera;
use crate::error::RenderError;
use crate::geometry::{Fp, Vec2i, Vec3f, EPS};

/// Raster coordinates further than this from the origin are treated as a
/// projection blow-up (vertex almost on the camera plane) and the triangle is
/// skipped. Keeps edge-function products well inside `i64`.
pub const GUARD_BAND: Fp = (1 << 20) as Fp;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterVertex {
    pub position: Vec2i,
    /// Distance along the view direction; always positive.
    pub depth: Fp,
    pub world_position: Vec3f,
}

/// Per-frame projection state: the viewport/camera pair is validated once,
/// then every triangle goes through [`VertexStage::transform`].
pub struct VertexStage<'a> {
    viewport: Viewport,
    camera: &'a Camera,
    rotation: Matrix3<Fp>,
}

impl<'a> VertexStage<'a> {
    pub fn new(viewport: &Viewport, camera: &'a Camera) -> Result<VertexStage<'a>, RenderError> {
        camera.check_viewport(viewport)?;
        Ok(VertexStage {
            viewport: *viewport,
            camera,
            rotation: *camera.rotation(),
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn project(&self, world_position: &Vec3f) -> Option<RasterVertex> {
        let camera_space = self.rotation * (world_position - self.camera.position());
        let depth = -camera_space.z;
        if depth <= EPS {
            return None;
        }

        let distance = self.camera.distance_to_canvas();
        let screen_x = camera_space.x / depth * distance;
        let screen_y = camera_space.y / depth * distance;
        let raster = self.camera.normalize(&self.viewport, screen_x, screen_y);
        if !(raster.x.abs() < GUARD_BAND && raster.y.abs() < GUARD_BAND) {
            return None;
        }

        Some(RasterVertex {
            position: Vec2i::new(raster.x.round() as i32, raster.y.round() as i32),
            depth,
            world_position: *world_position,
        })
    }

    /// Returns `None` if any corner is on or behind the camera plane or lands
    /// outside the guard band; such triangles are dropped whole.
    pub fn transform(&self, vertices: &[Vec3f; 3]) -> Option<[RasterVertex; 3]> {
        Some([
            self.project(&vertices[0])?,
            self.project(&vertices[1])?,
            self.project(&vertices[2])?,
        ])
    }
}

pub fn vertex_shader(
    viewport: &Viewport,
    vertices: &[Vec3f; 3],
    camera: &Camera,
) -> Result<Option<[RasterVertex; 3]>, RenderError> {
    Ok(VertexStage::new(viewport, camera)?.transform(vertices))
}
