use crate::aabb::Viewport;
use crate::arena::Arena;
use crate::camera::Camera;
use crate::color::Color;
use crate::error::RenderError;
use crate::framebuffer::FrameBuffers;
use crate::geometry::{Triangle, Vec2i};
use crate::interpolation::interpolate;
use crate::intersection::cohen_sutherland_line_clip;
use crate::rasterizer::{clockwise, for_each_fragment, signed_area, Fragment};
use crate::scene::Scene;
use crate::shading::{shade, Light};
use crate::vertex::VertexStage;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub background: Color,
    /// Drop triangles seen from behind instead of drawing both sides.
    pub cull_back_faces: bool,
    pub wireframe: Option<Color>,
    /// Scratch space for the fragments of one triangle. Defaults to the
    /// viewport area, which no triangle can exceed.
    pub fragment_budget: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            background: Color::zeros(),
            cull_back_faces: false,
            wireframe: None,
            fragment_budget: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    /// Triangles skipped before rasterization: behind the camera, degenerate
    /// or back-facing with culling enabled.
    pub culled: usize,
    pub fragments: usize,
    pub written: usize,
    /// Fragments lost to an exhausted fragment budget.
    pub dropped: usize,
}

pub struct Renderer {
    viewport: Viewport,
    buffers: FrameBuffers,
    arena: Arena<Fragment>,
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> Renderer {
        let budget = settings.fragment_budget.unwrap_or(width * height);
        Renderer {
            viewport: Viewport::from_size(width as i32, height as i32),
            buffers: FrameBuffers::new(width, height),
            arena: Arena::with_capacity(budget),
            settings,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    pub fn into_buffers(self) -> FrameBuffers {
        self.buffers
    }

    /// Draws one frame from scratch.
    ///
    /// Configuration problems are reported before the buffers are touched.
    pub fn render_frame(
        &mut self,
        triangles: &[Triangle],
        camera: &Camera,
        light: &Light,
    ) -> Result<FrameStats, RenderError> {
        let stage = VertexStage::new(&self.viewport, camera)?;
        let Renderer {
            viewport,
            buffers,
            arena,
            settings,
        } = self;

        buffers.reset(camera.far(), settings.background);
        arena.reset();

        let mut stats = FrameStats {
            triangles: triangles.len(),
            ..FrameStats::default()
        };
        let mut outlines = Vec::new();

        for (index, triangle) in triangles.iter().enumerate() {
            let Some(vertices) = stage.transform(&triangle.vertices()) else {
                stats.culled += 1;
                continue;
            };
            let area = signed_area(&vertices);
            if area == 0 || (area > 0 && settings.cull_back_faces) {
                stats.culled += 1;
                continue;
            }
            let vertices = clockwise(vertices);
            if settings.wireframe.is_some() {
                outlines.push(vertices.map(|v| v.position));
            }

            arena.scope(|arena| {
                let mark = arena.mark();
                stats.fragments += for_each_fragment(viewport, &vertices, |fragment| {
                    if arena.push(fragment).is_err() {
                        stats.dropped += 1;
                    }
                });
                for fragment in arena.since(mark) {
                    if fragment.depth < camera.near() {
                        continue;
                    }
                    let accepted = buffers.composite(fragment, |fragment| {
                        shade(&fragment.world_position, index, triangles, light)
                    });
                    if accepted {
                        stats.written += 1;
                    }
                }
            });
        }

        if stats.dropped > 0 {
            log::warn!(
                "fragment budget of {} exhausted, {} fragments dropped",
                arena.limit(),
                stats.dropped
            );
        }
        if let Some(color) = settings.wireframe {
            for outline in &outlines {
                draw_outline(viewport, buffers, outline, color);
            }
        }
        log::debug!("frame stats: {:?}", stats);
        Ok(stats)
    }
}

fn draw_line(viewport: &Viewport, buffers: &mut FrameBuffers, start: Vec2i, stop: Vec2i, color: Color) {
    let (mut start, mut stop) = (start, stop);
    if !cohen_sutherland_line_clip(viewport, &mut start, &mut stop) {
        return;
    }
    let delta = stop - start;
    let samples = delta.x.abs().max(delta.y.abs()) as usize + 1;
    for pixel in interpolate(start, stop, samples) {
        if let Some(target) = buffers.color.get_mut(&pixel) {
            *target = color;
        }
    }
}

fn draw_outline(viewport: &Viewport, buffers: &mut FrameBuffers, outline: &[Vec2i; 3], color: Color) {
    for i in 0..3 {
        draw_line(viewport, buffers, outline[i], outline[(i + 1) % 3], color);
    }
}

pub fn render_scene(scene: &Scene) -> Result<FrameBuffers, RenderError> {
    let mut renderer = Renderer::new(scene.width, scene.height, scene.render_settings());
    let stats = renderer.render_frame(&scene.triangles, &scene.camera, &scene.light)?;
    log::info!(
        "rendered {} of {} triangles, {} fragments written",
        stats.triangles - stats.culled,
        stats.triangles,
        stats.written
    );
    Ok(renderer.into_buffers())
}
