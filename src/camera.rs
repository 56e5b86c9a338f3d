//! Pinhole camera with a yaw-only orientation.
//!
//! The canvas is defined by the film aperture and the focal length; the field
//! of view is always derived from those two and never stored.

use nalgebra::{Matrix3, Matrix4};

use crate::aabb::Viewport;
use crate::error::RenderError;
use crate::geometry::{Fp, Vec2f, Vec3f};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePlane {
    pub left: Fp,
    pub right: Fp,
    pub top: Fp,
    pub bottom: Fp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraSettings {
    pub position: Vec3f,
    pub yaw: Fp,
    pub near: Fp,
    pub far: Fp,
    pub focal_length: Fp,
    pub film_aperture_width: Fp,
    pub film_aperture_height: Fp,
    pub distance_to_canvas: Fp,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            position: Vec3f::zeros(),
            yaw: 0.0,
            near: 1.0,
            far: 1000.0,
            focal_length: 20.0,
            film_aperture_width: 21.0,
            film_aperture_height: 21.0,
            distance_to_canvas: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3f,
    right: Vec3f,
    up: Vec3f,
    forward: Vec3f,
    yaw: Fp,
    near: Fp,
    far: Fp,
    focal_length: Fp,
    film_aperture_width: Fp,
    film_aperture_height: Fp,
    distance_to_canvas: Fp,
    rotation: Matrix3<Fp>,
    perspective: Matrix4<Fp>,
}

fn check_positive(name: &'static str, value: Fp) -> Result<(), RenderError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RenderError::InvalidCameraParameter { name, value })
    }
}

fn check_clip_planes(near: Fp, far: Fp) -> Result<(), RenderError> {
    if near.is_finite() && far.is_finite() && 0.0 < near && near < far {
        Ok(())
    } else {
        Err(RenderError::InvalidClipPlanes { near, far })
    }
}

pub fn rotation_matrix_y(radians: Fp) -> Matrix3<Fp> {
    let (s, c) = radians.sin_cos();
    Matrix3::new(
        c, 0.0, -s, //
        0.0, 1.0, 0.0, //
        s, 0.0, c,
    )
}

/// Perspective projection for a camera looking down -Z.
///
/// `fov` is the full angle in radians. Multiplying a camera-space point
/// `(x, y, z, 1)` yields clip coordinates whose `w` is `-z`.
pub fn perspective_matrix(near: Fp, far: Fp, fov: Fp) -> Matrix4<Fp> {
    let s = 1.0 / (fov / 2.0).tan();
    let a = -far / (far - near);
    let b = -(far * near) / (far - near);
    Matrix4::new(
        s, 0.0, 0.0, 0.0, //
        0.0, s, 0.0, 0.0, //
        0.0, 0.0, a, b, //
        0.0, 0.0, -1.0, 0.0,
    )
}

impl Camera {
    pub fn new(settings: &CameraSettings) -> Result<Camera, RenderError> {
        check_positive("focal_length", settings.focal_length)?;
        check_positive("film_aperture_width", settings.film_aperture_width)?;
        check_positive("film_aperture_height", settings.film_aperture_height)?;
        check_positive("distance_to_canvas", settings.distance_to_canvas)?;
        check_clip_planes(settings.near, settings.far)?;
        if !settings.yaw.is_finite() || settings.position.iter().any(|c| !c.is_finite()) {
            return Err(RenderError::InvalidCameraParameter {
                name: "position/yaw",
                value: settings.yaw,
            });
        }

        let mut camera = Camera {
            position: settings.position,
            right: Vec3f::x(),
            up: Vec3f::y(),
            forward: -Vec3f::z(),
            yaw: settings.yaw,
            near: settings.near,
            far: settings.far,
            focal_length: settings.focal_length,
            film_aperture_width: settings.film_aperture_width,
            film_aperture_height: settings.film_aperture_height,
            distance_to_canvas: settings.distance_to_canvas,
            rotation: Matrix3::identity(),
            perspective: Matrix4::identity(),
        };
        camera.update_orientation();
        camera.update_perspective();
        Ok(camera)
    }

    fn update_orientation(&mut self) {
        let rotation = rotation_matrix_y(self.yaw);
        self.right = rotation * Vec3f::x();
        self.up = -(rotation * Vec3f::y());
        self.forward = -(rotation * Vec3f::z());
        self.rotation = rotation;
    }

    fn update_perspective(&mut self) {
        self.perspective = perspective_matrix(self.near, self.far, self.fov_x());
    }

    pub fn position(&self) -> Vec3f {
        self.position
    }

    pub fn right(&self) -> Vec3f {
        self.right
    }

    /// Points along world -Y: movement controls treat world Y as growing
    /// downwards even though the image is displayed with Y up.
    pub fn up(&self) -> Vec3f {
        self.up
    }

    pub fn forward(&self) -> Vec3f {
        self.forward
    }

    pub fn yaw(&self) -> Fp {
        self.yaw
    }

    pub fn near(&self) -> Fp {
        self.near
    }

    pub fn far(&self) -> Fp {
        self.far
    }

    pub fn focal_length(&self) -> Fp {
        self.focal_length
    }

    pub fn distance_to_canvas(&self) -> Fp {
        self.distance_to_canvas
    }

    pub fn film_aperture(&self) -> (Fp, Fp) {
        (self.film_aperture_width, self.film_aperture_height)
    }

    pub fn film_aspect_ratio(&self) -> Fp {
        self.film_aperture_width / self.film_aperture_height
    }

    /// Cached `R_y(yaw)`. Takes `world - position` into camera space; its
    /// columns are `right`, `-up` and `-forward`.
    pub fn rotation(&self) -> &Matrix3<Fp> {
        &self.rotation
    }

    pub fn perspective(&self) -> &Matrix4<Fp> {
        &self.perspective
    }

    /// Horizontal field of view in radians.
    pub fn fov_x(&self) -> Fp {
        2.0 * ((self.film_aperture_width / 2.0) / self.focal_length).atan()
    }

    pub fn fov_y(&self) -> Fp {
        2.0 * ((self.film_aperture_height / 2.0) / self.focal_length).atan()
    }

    pub fn image_plane(&self) -> ImagePlane {
        let top = ((self.film_aperture_height / 2.0) / self.focal_length) * self.distance_to_canvas;
        let right = ((self.film_aperture_width / 2.0) / self.focal_length) * self.distance_to_canvas;
        ImagePlane {
            left: -right,
            right,
            top,
            bottom: -top,
        }
    }

    pub fn set_position(&mut self, position: Vec3f) {
        self.position = position;
    }

    pub fn translate(&mut self, offset: Vec3f) {
        self.position += offset;
    }

    pub fn set_yaw(&mut self, yaw: Fp) {
        self.yaw = yaw;
        self.update_orientation();
    }

    pub fn rotate(&mut self, delta_yaw: Fp) {
        self.set_yaw(self.yaw + delta_yaw);
    }

    pub fn set_clip_planes(&mut self, near: Fp, far: Fp) -> Result<(), RenderError> {
        check_clip_planes(near, far)?;
        self.near = near;
        self.far = far;
        self.update_perspective();
        Ok(())
    }

    pub fn set_focal_length(&mut self, focal_length: Fp) -> Result<(), RenderError> {
        check_positive("focal_length", focal_length)?;
        self.focal_length = focal_length;
        self.update_perspective();
        Ok(())
    }

    /// Fails when the viewport is empty or its shape differs from the film's.
    pub fn check_viewport(&self, viewport: &Viewport) -> Result<(), RenderError> {
        if viewport.is_empty() {
            return Err(RenderError::EmptyViewport {
                width: viewport.width(),
                height: viewport.height(),
            });
        }
        let device = viewport.width() as Fp / viewport.height() as Fp;
        let film = self.film_aspect_ratio();
        if (device - film).abs() > 0.001 {
            return Err(RenderError::AspectRatioMismatch { device, film });
        }
        Ok(())
    }

    /// Maps an image-plane point to raster coordinates inside `viewport`.
    ///
    /// NDC grows upwards while raster rows grow downwards, hence the flip.
    pub fn normalize(&self, viewport: &Viewport, x: Fp, y: Fp) -> Vec2f {
        let ImagePlane {
            left: l,
            right: r,
            top: t,
            bottom: b,
        } = self.image_plane();
        let ndc_x = (2.0 * x - (r + l)) / (r - l);
        let ndc_y = (2.0 * y - (t + b)) / (t - b);

        Vec2f::new(
            viewport.left as Fp + ((ndc_x + 1.0) / 2.0) * viewport.width() as Fp,
            viewport.top as Fp + ((1.0 - ndc_y) / 2.0) * viewport.height() as Fp,
        )
    }
}
