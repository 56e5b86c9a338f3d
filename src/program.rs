use crate::camera::Camera;
use crate::error::RenderError;
use crate::geometry::{Fp, Triangle, Vec3f};
use crate::rendering::{FrameStats, RenderSettings, Renderer};
use crate::scene::Scene;
use crate::shading::Light;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Moves the light instead of the camera.
    pub move_light: bool,
}

#[derive(Clone, Debug, Default)]
pub struct SoundBuffer {
    pub samples_per_second: u32,
    pub samples: Vec<[i16; 2]>,
}

/// The capabilities a frame loop drives, in call order: `initialize` once,
/// then `update` and `render_sound` every frame.
pub trait Program {
    fn initialize(&mut self) -> Result<(), RenderError>;

    /// Applies input and redraws if anything changed. Returns the stats of
    /// the drawn frame, or `None` when the previous frame is still valid.
    fn update(&mut self, input: &InputState, delta: Fp) -> Result<Option<FrameStats>, RenderError>;

    fn render_sound(&mut self, buffer: &mut SoundBuffer);
}

/// Moves the camera relative to what it currently sees: `forward` heads for
/// the image center and `right` slides toward the right image edge.
pub fn update_camera(camera: &mut Camera, input: &InputState, delta: Fp) -> bool {
    let movement = 5.0 * delta;
    let rotation = 1.0 * delta;
    let to_world = camera.rotation().transpose();
    let view_right = to_world * Vec3f::x();
    let view_forward = -(to_world * Vec3f::z());
    let mut offset = Vec3f::zeros();
    let mut yaw = 0.0;
    let mut updated = false;

    let mut apply = |pressed: bool, direction: Vec3f| {
        if pressed {
            offset += direction * movement;
            updated = true;
        }
    };
    apply(input.right, view_right);
    apply(input.left, -view_right);
    apply(input.forward, view_forward);
    apply(input.backward, -view_forward);
    apply(input.up, camera.up());
    apply(input.down, -camera.up());

    // Positive yaw swings the view toward -X.
    if input.turn_left {
        yaw += rotation;
        updated = true;
    }
    if input.turn_right {
        yaw -= rotation;
        updated = true;
    }

    if updated {
        camera.translate(offset);
        camera.rotate(yaw);
    }
    updated
}

pub fn update_light(light: &mut Light, input: &InputState, delta: Fp) -> bool {
    let movement = 2.0 * delta;
    let mut updated = false;
    let mut apply = |pressed: bool, direction: Vec3f| {
        if pressed {
            light.position += direction * movement;
            updated = true;
        }
    };
    apply(input.right, Vec3f::x());
    apply(input.left, -Vec3f::x());
    apply(input.forward, -Vec3f::z());
    apply(input.backward, Vec3f::z());
    apply(input.up, -Vec3f::y());
    apply(input.down, Vec3f::y());
    updated
}

pub struct RasterProgram {
    camera: Camera,
    light: Light,
    triangles: Vec<Triangle>,
    renderer: Renderer,
    needs_redraw: bool,
}

impl RasterProgram {
    pub fn new(scene: Scene) -> RasterProgram {
        let renderer = Renderer::new(scene.width, scene.height, scene.render_settings());
        RasterProgram {
            camera: scene.camera,
            light: scene.light,
            triangles: scene.triangles,
            renderer,
            needs_redraw: true,
        }
    }

    pub fn with_settings(scene: Scene, settings: RenderSettings) -> RasterProgram {
        let mut program = RasterProgram::new(scene);
        *program.renderer.settings_mut() = settings;
        program
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl Program for RasterProgram {
    fn initialize(&mut self) -> Result<(), RenderError> {
        self.camera.check_viewport(self.renderer.viewport())?;
        self.needs_redraw = true;
        log::info!(
            "initialized {}x{} program with {} triangles",
            self.renderer.viewport().width(),
            self.renderer.viewport().height(),
            self.triangles.len()
        );
        Ok(())
    }

    fn update(&mut self, input: &InputState, delta: Fp) -> Result<Option<FrameStats>, RenderError> {
        let changed = if input.move_light {
            update_light(&mut self.light, input, delta)
        } else {
            update_camera(&mut self.camera, input, delta)
        };
        if !(changed || self.needs_redraw) {
            return Ok(None);
        }
        let stats = self
            .renderer
            .render_frame(&self.triangles, &self.camera, &self.light)?;
        self.needs_redraw = false;
        Ok(Some(stats))
    }

    /// The rasterizer makes no sound; the buffer is filled with silence.
    fn render_sound(&mut self, buffer: &mut SoundBuffer) {
        buffer.samples.fill([0, 0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn program() -> RasterProgram {
        RasterProgram::new(Scene::cornell_box(40).unwrap())
    }

    #[test]
    fn test_camera_moves_along_its_view() {
        let mut camera = Scene::cornell_box(10).unwrap().camera;
        let input = InputState {
            forward: true,
            ..InputState::default()
        };
        assert!(update_camera(&mut camera, &input, 0.1));
        assert_relative_eq!(camera.position(), Vec3f::new(0.0, 0.0, 2.5), epsilon = 1e-12);

        camera.set_yaw(FRAC_PI_2);
        let input = InputState {
            right: true,
            ..InputState::default()
        };
        update_camera(&mut camera, &input, 0.2);
        assert_relative_eq!(camera.position(), Vec3f::new(0.0, 0.0, 1.5), epsilon = 1e-12);
    }

    #[test]
    fn test_forward_keeps_target_in_image_center() {
        let mut camera = Scene::cornell_box(10).unwrap().camera;
        camera.set_yaw(0.4);
        let viewport = crate::aabb::Viewport::from_size(100, 100);
        let target = Vec3f::new(-0.4f64.sin(), 0.0, -0.4f64.cos()) * 6.0 + camera.position();
        let input = InputState {
            forward: true,
            ..InputState::default()
        };
        update_camera(&mut camera, &input, 0.1);
        let projected = crate::vertex::vertex_shader(&viewport, &[target; 3], &camera)
            .unwrap()
            .unwrap();
        assert_eq!(projected[0].position, crate::geometry::Vec2i::new(50, 50));
        assert_relative_eq!(projected[0].depth, 5.5, epsilon = 1e-9);
    }

    #[test]
    fn test_camera_turns_and_refreshes_basis() {
        let mut camera = Scene::cornell_box(10).unwrap().camera;
        let input = InputState {
            turn_right: true,
            ..InputState::default()
        };
        update_camera(&mut camera, &input, 0.5);
        assert_relative_eq!(camera.yaw(), -0.5);
        assert_relative_eq!(*camera.rotation(), crate::camera::rotation_matrix_y(-0.5));

        // A point to the right of the old view is now straight ahead.
        let ahead = Vec3f::new(0.5f64.sin(), 0.0, -0.5f64.cos()) * 2.0 + camera.position();
        let camera_space = camera.rotation() * (ahead - camera.position());
        assert_relative_eq!(camera_space, Vec3f::new(0.0, 0.0, -2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_no_input_changes_nothing() {
        let mut camera = Scene::cornell_box(10).unwrap().camera;
        let mut light = Light::default();
        assert!(!update_camera(&mut camera, &InputState::default(), 1.0));
        assert!(!update_light(&mut light, &InputState::default(), 1.0));
        assert_eq!(light, Light::default());
    }

    #[test]
    fn test_light_moves_in_world_axes() {
        let mut light = Light::default();
        let input = InputState {
            right: true,
            forward: true,
            up: true,
            ..InputState::default()
        };
        assert!(update_light(&mut light, &input, 0.5));
        assert_relative_eq!(light.position, Vec3f::new(1.0, -0.5, -0.3), epsilon = 1e-12);
    }

    #[test]
    fn test_program_redraws_only_when_needed() {
        let mut program = program();
        program.initialize().unwrap();
        let idle = InputState::default();

        let first = program.update(&idle, 0.016).unwrap();
        assert!(first.is_some_and(|stats| stats.written > 0));
        assert!(program.update(&idle, 0.016).unwrap().is_none());

        let light_input = InputState {
            move_light: true,
            left: true,
            ..InputState::default()
        };
        let camera_before = program.camera().position();
        assert!(program.update(&light_input, 0.016).unwrap().is_some());
        assert_eq!(program.camera().position(), camera_before);
        assert!(program.light().position.x < 0.0);
    }

    #[test]
    fn test_sound_is_silent() {
        let mut program = program();
        let mut buffer = SoundBuffer {
            samples_per_second: 48_000,
            samples: vec![[7, -7]; 16],
        };
        program.render_sound(&mut buffer);
        assert!(buffer.samples.iter().all(|s| *s == [0, 0]));
    }
}
