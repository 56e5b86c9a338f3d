use std::fs;
use std::path::Path;

use crate::aabb::Viewport;
use crate::camera::{Camera, CameraSettings};
use crate::color::Color;
use crate::error::SceneError;
use crate::geometry::{Fp, Triangle, Vec3f};
use crate::gltf_to_scene::load_gltf_triangles;
use crate::rendering::RenderSettings;
use crate::shading::Light;
use crate::test_model::cornell_box;

pub const DEFAULT_SIZE: usize = 400;

#[derive(Clone, Debug)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    pub background: Color,
    pub camera: Camera,
    pub light: Light,
    pub triangles: Vec<Triangle>,
    pub cull_back_faces: bool,
    pub wireframe: Option<Color>,
}

impl Scene {
    /// The built-in test model seen from `(0, 0, 3)` on a square image.
    pub fn cornell_box(size: usize) -> Result<Scene, SceneError> {
        let camera = Camera::new(&CameraSettings {
            position: Vec3f::new(0.0, 0.0, 3.0),
            ..CameraSettings::default()
        })?;
        Ok(Scene {
            width: size,
            height: size,
            background: Color::zeros(),
            camera,
            light: Light::default(),
            triangles: cornell_box(),
            cull_back_faces: false,
            wireframe: None,
        })
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            background: self.background,
            cull_back_faces: self.cull_back_faces,
            wireframe: self.wireframe,
            fragment_budget: None,
        }
    }
}

struct PendingTriangle {
    line: usize,
    vertices: Option<[Vec3f; 3]>,
    normal: Option<Vec3f>,
    color: Color,
}

impl PendingTriangle {
    fn new(line: usize) -> PendingTriangle {
        PendingTriangle {
            line,
            vertices: None,
            normal: None,
            color: Color::new(0.75, 0.75, 0.75),
        }
    }

    fn finish(self) -> Result<Triangle, SceneError> {
        let [v0, v1, v2] = self
            .vertices
            .ok_or(SceneError::MissingVertices { line: self.line })?;
        let triangle = Triangle::new(v0, v1, v2, self.color);
        Ok(match self.normal {
            Some(normal) => triangle.with_normal(normal),
            None => triangle,
        })
    }
}

fn parse_numbers<T: std::str::FromStr + Copy + Default, const N: usize>(
    line: usize,
    command: &str,
    args: &[&str],
) -> Result<[T; N], SceneError> {
    if args.len() != N {
        return Err(SceneError::ArgumentCount {
            line,
            command: command.to_string(),
            expected: N,
            found: args.len(),
        });
    }
    let mut result = [T::default(); N];
    for (slot, token) in result.iter_mut().zip(args) {
        *slot = token.parse().map_err(|_| SceneError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(result)
}

fn expect_no_arguments(line: usize, command: &str, args: &[&str]) -> Result<(), SceneError> {
    parse_numbers::<Fp, 0>(line, command, args).map(|_| ())
}

/// Parses a scene description. `MESH` paths are resolved against `base_dir`.
pub fn parse_scene(content: &str, base_dir: &Path) -> Result<Scene, SceneError> {
    let mut width = DEFAULT_SIZE;
    let mut height = DEFAULT_SIZE;
    let mut background = Color::zeros();
    let mut camera = CameraSettings::default();
    let mut light = Light::default();
    let mut triangles = Vec::new();
    let mut cull_back_faces = false;
    let mut wireframe = None;
    let mut current: Option<PendingTriangle> = None;

    for (index, raw_line) in content.lines().enumerate() {
        let line = index + 1;
        let tokens: Vec<&str> = raw_line.split_whitespace().collect();
        let Some((command, args)) = tokens.split_first() else {
            continue;
        };
        if command.starts_with('#') {
            continue;
        }
        let command = *command;

        let vector = || -> Result<Vec3f, SceneError> {
            let [x, y, z] = parse_numbers::<Fp, 3>(line, command, args)?;
            Ok(Vec3f::new(x, y, z))
        };
        let scalar = || -> Result<Fp, SceneError> {
            let [value] = parse_numbers::<Fp, 1>(line, command, args)?;
            Ok(value)
        };
        let no_triangle = || SceneError::NoCurrentTriangle {
            line,
            command: command.to_string(),
        };

        match command {
            "DIMENSIONS" => {
                [width, height] = parse_numbers::<usize, 2>(line, command, args)?;
            }
            "BG_COLOR" => background = vector()?,
            "CAMERA_POSITION" => camera.position = vector()?,
            "CAMERA_YAW" => camera.yaw = scalar()?,
            "CAMERA_NEAR" => camera.near = scalar()?,
            "CAMERA_FAR" => camera.far = scalar()?,
            "FOCAL_LENGTH" => camera.focal_length = scalar()?,
            "FILM_APERTURE" => {
                [camera.film_aperture_width, camera.film_aperture_height] =
                    parse_numbers::<Fp, 2>(line, command, args)?;
            }
            "DISTANCE_TO_CANVAS" => camera.distance_to_canvas = scalar()?,
            "LIGHT_POSITION" => light.position = vector()?,
            "LIGHT_COLOR" => light.color = vector()?,
            "AMBIENT_LIGHT" => light.ambient = vector()?,
            "CULL_BACK_FACES" => {
                expect_no_arguments(line, command, args)?;
                cull_back_faces = true;
            }
            "WIREFRAME" => wireframe = Some(vector()?),
            "CORNELL_BOX" => {
                expect_no_arguments(line, command, args)?;
                triangles.extend(cornell_box());
            }
            "MESH" => {
                let [path] = args else {
                    return Err(SceneError::ArgumentCount {
                        line,
                        command: command.to_string(),
                        expected: 1,
                        found: args.len(),
                    });
                };
                let mesh = load_gltf_triangles(&base_dir.join(path))?;
                log::info!("loaded {} triangles from {}", mesh.len(), path);
                triangles.extend(mesh);
            }
            "NEW_TRIANGLE" => {
                expect_no_arguments(line, command, args)?;
                if let Some(pending) = current.replace(PendingTriangle::new(line)) {
                    triangles.push(pending.finish()?);
                }
            }
            "TRIANGLE" => {
                let c = parse_numbers::<Fp, 9>(line, command, args)?;
                current.as_mut().ok_or_else(no_triangle)?.vertices = Some([
                    Vec3f::new(c[0], c[1], c[2]),
                    Vec3f::new(c[3], c[4], c[5]),
                    Vec3f::new(c[6], c[7], c[8]),
                ]);
            }
            "NORMAL" => {
                let normal = vector()?;
                current.as_mut().ok_or_else(no_triangle)?.normal = Some(normal);
            }
            "COLOR" => {
                let color = vector()?;
                current.as_mut().ok_or_else(no_triangle)?.color = color;
            }
            _ => {
                return Err(SceneError::UnknownCommand {
                    line,
                    command: command.to_string(),
                })
            }
        }
    }
    if let Some(pending) = current {
        triangles.push(pending.finish()?);
    }

    if width == 0 || height == 0 {
        return Err(SceneError::InvalidDimensions { width, height });
    }
    let camera = Camera::new(&camera)?;
    let scene = Scene {
        width,
        height,
        background,
        camera,
        light,
        triangles,
        cull_back_faces,
        wireframe,
    };
    scene
        .camera
        .check_viewport(&Viewport::from_size(width as i32, height as i32))?;
    Ok(scene)
}

pub fn load_scene(path: &Path) -> Result<Scene, SceneError> {
    let content = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let scene = parse_scene(&content, base_dir)?;
    log::info!(
        "loaded scene {} ({}x{}, {} triangles)",
        path.display(),
        scene.width,
        scene.height,
        scene.triangles.len()
    );
    Ok(scene)
}
