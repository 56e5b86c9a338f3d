use std::path::Path;

use gltf::buffer::Data;
use gltf::mesh::Mode;
use nalgebra::{Matrix4, Vector4};

use crate::color::Color;
use crate::error::SceneError;
use crate::geometry::{Fp, Triangle, Vec3f};

/// Imports every triangle mesh of every scene in a glTF file, with node
/// transforms applied and the base color factor as the triangle color.
pub fn load_gltf_triangles(path: &Path) -> Result<Vec<Triangle>, SceneError> {
    let (document, buffers, _images) = gltf::import(path).map_err(|source| SceneError::Gltf {
        path: path.to_path_buf(),
        source,
    })?;

    let mut triangles = Vec::new();
    let identity = Matrix4::<Fp>::identity();
    for gltf_scene in document.scenes() {
        for node in gltf_scene.nodes() {
            read_triangles(path, &mut triangles, &buffers, &node, &identity)?;
        }
    }
    log::debug!("{}: {} triangles", path.display(), triangles.len());
    Ok(triangles)
}

fn transform_point(transformation: &Matrix4<Fp>, point: &[f32; 3]) -> Vec3f {
    let p = transformation * Vector4::new(point[0] as Fp, point[1] as Fp, point[2] as Fp, 1.0);
    Vec3f::new(p.x / p.w, p.y / p.w, p.z / p.w)
}

fn read_triangles(
    path: &Path,
    triangles: &mut Vec<Triangle>,
    buffers: &[Data],
    node: &gltf::Node,
    transformation: &Matrix4<Fp>,
) -> Result<(), SceneError> {
    // glTF stores matrices column-major.
    let local = node.transform().matrix();
    let local = Matrix4::from_fn(|row, column| local[column][row] as Fp);
    let transformation = transformation * local;

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                log::warn!(
                    "{}: skipping primitive {} of mesh {} drawn as {:?}",
                    path.display(),
                    primitive.index(),
                    mesh.index(),
                    primitive.mode()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
            let positions: Vec<Vec3f> = reader
                .read_positions()
                .ok_or_else(|| SceneError::UnsupportedMesh {
                    path: path.to_path_buf(),
                    message: format!("mesh {} has no positions", mesh.index()),
                })?
                .map(|p| transform_point(&transformation, &p))
                .collect();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let base = primitive.material().pbr_metallic_roughness().base_color_factor();
            let color = Color::new(base[0] as Fp, base[1] as Fp, base[2] as Fp);

            for corner in indices.chunks_exact(3) {
                let vertex = |i: u32| {
                    positions.get(i as usize).copied().ok_or_else(|| SceneError::UnsupportedMesh {
                        path: path.to_path_buf(),
                        message: format!("index {} out of range in mesh {}", i, mesh.index()),
                    })
                };
                let (a, b, c) = (vertex(corner[0])?, vertex(corner[1])?, vertex(corner[2])?);
                // Counter-clockwise front faces, as glTF defines them.
                triangles.push(Triangle::new(a, b, c, color).with_normal((b - a).cross(&(c - a))));
            }
        }
    }

    for child in node.children() {
        read_triangles(path, triangles, buffers, &child, &transformation)?;
    }
    Ok(())
}
