//! Growing geometry lists filled while an OBJ file is scanned

use super::diagnostics::ParseWarning;
use super::materials::Material;
use super::scene::{Face, Scene};

/// Accumulates geometry records in file order
///
/// Faces and their material names are pushed together, so both lists always
/// have the same length.
#[derive(Debug, Default)]
pub struct GeometryAccumulator {
    positions: Vec<Vec<f32>>,
    texture_coords: Vec<Vec<f32>>,
    normals: Vec<Vec<f32>>,
    faces: Vec<Face>,
    face_materials: Vec<String>,
}

impl GeometryAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `v` record
    pub fn push_position(&mut self, record: Vec<f32>) {
        self.positions.push(record);
    }

    /// Append a `vt` record
    pub fn push_texture_coord(&mut self, record: Vec<f32>) {
        self.texture_coords.push(record);
    }

    /// Append a `vn` record
    pub fn push_normal(&mut self, record: Vec<f32>) {
        self.normals.push(record);
    }

    /// Append a face and its material name
    pub fn push_face(&mut self, face: Face) {
        self.face_materials.push(face.material.clone());
        self.faces.push(face);
    }

    /// Number of positions so far
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces so far
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Move the accumulated geometry into a scene
    pub fn finish(self, materials: Vec<Material>, warnings: Vec<ParseWarning>) -> Scene {
        Scene {
            positions: self.positions,
            texture_coords: self.texture_coords,
            normals: self.normals,
            faces: self.faces,
            face_materials: self.face_materials,
            materials,
            warnings,
        }
    }
}
