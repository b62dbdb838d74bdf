//! OBJ file loader for 3D models

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::foundation::math::{Vec2, Vec3};
use crate::render::mesh::Mesh;

/// Errors produced while loading an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// Underlying file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A numeric field failed to parse
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The file structure is not valid OBJ
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Loader for triangulated Wavefront OBJ files
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    ///
    /// Faces are assumed triangulated. Position/UV/normal indices are
    /// re-expanded into flat per-vertex arrays, since OBJ indexes each
    /// attribute independently.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut positions: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();
        let mut uvs: Vec<Vec2> = Vec::new();
        let mut mesh = Mesh::default();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => {
                    if parts.len() >= 4 {
                        positions.push(Vec3::new(
                            parse_float(parts[1], "vertex x")?,
                            parse_float(parts[2], "vertex y")?,
                            parse_float(parts[3], "vertex z")?,
                        ));
                    }
                }
                "vn" => {
                    if parts.len() >= 4 {
                        normals.push(Vec3::new(
                            parse_float(parts[1], "normal x")?,
                            parse_float(parts[2], "normal y")?,
                            parse_float(parts[3], "normal z")?,
                        ));
                    }
                }
                "vt" => {
                    if parts.len() >= 3 {
                        uvs.push(Vec2::new(
                            parse_float(parts[1], "tex coord u")?,
                            parse_float(parts[2], "tex coord v")?,
                        ));
                    }
                }
                "f" => {
                    if parts.len() >= 4 {
                        for corner in &parts[1..4] {
                            emit_corner(corner, &positions, &normals, &uvs, &mut mesh)?;
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(mesh)
    }
}

fn parse_float(text: &str, what: &str) -> Result<f32, ObjError> {
    text.parse()
        .map_err(|_| ObjError::ParseError(format!("Invalid {what}: {text}")))
}

fn emit_corner(
    corner: &str,
    positions: &[Vec3],
    normals: &[Vec3],
    uvs: &[Vec2],
    mesh: &mut Mesh,
) -> Result<(), ObjError> {
    let fields: Vec<&str> = corner.split('/').collect();

    // OBJ indices are 1-based
    let position_index: usize = fields[0]
        .parse::<usize>()
        .map_err(|_| ObjError::ParseError(format!("Invalid position index: {corner}")))?
        - 1;
    let position = *positions
        .get(position_index)
        .ok_or_else(|| ObjError::InvalidFormat("Position index out of bounds".to_string()))?;

    let uv = fields
        .get(1)
        .filter(|f| !f.is_empty())
        .and_then(|f| f.parse::<usize>().ok())
        .and_then(|i| uvs.get(i - 1).copied());

    let normal = fields
        .get(2)
        .filter(|f| !f.is_empty())
        .and_then(|f| f.parse::<usize>().ok())
        .and_then(|i| normals.get(i - 1).copied());

    let index = mesh.positions.len() as u32;
    mesh.positions.push(position);
    mesh.uvs.push(uv.unwrap_or_else(Vec2::zeros));
    mesh.normals.push(normal.unwrap_or_else(Vec3::zeros));
    mesh.indices.push(index);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_from_source(name: &str, source: &str) -> Mesh {
        let mut path = std::env::temp_dir();
        path.push(format!("rebound_obj_{}_{}.obj", name, std::process::id()));
        let mut file = File::create(&path).expect("temp file");
        file.write_all(source.as_bytes()).expect("write obj");
        let mesh = ObjLoader::load_obj(&path).expect("load obj");
        let _ = std::fs::remove_file(&path);
        mesh
    }

    #[test]
    fn test_load_single_triangle() {
        let mesh = load_from_source(
            "triangle",
            "# comment\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             vn 0 0 1\n\
             f 1//1 2//1 3//1\n",
        );

        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.normals[0], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_missing_attributes_fall_back_to_zero() {
        let mesh = load_from_source(
            "fallback",
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             f 1 2 3\n",
        );

        assert_eq!(mesh.normals[0], Vec3::zeros());
        assert_eq!(mesh.uvs[0], Vec2::zeros());
    }
}
