//! Scene description produced by the OBJ parser

use serde::{Deserialize, Serialize};

use super::diagnostics::ParseWarning;
use super::materials::Material;

/// Slot layout of a face corner, as written in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceFormat {
    /// `v`
    Vertex,
    /// `v/vt`
    VertexTexture,
    /// `v/vt/vn`
    VertexTextureNormal,
    /// `v//vn`
    VertexNormal,
}

impl FaceFormat {
    /// Detect the layout of a single corner from its slashes
    ///
    /// One slash means a texture slot is present, two or more mean a normal
    /// slot is present too. An empty second slot marks `v//vn`.
    pub fn detect(corner: &str) -> Self {
        let mut slots = corner.split('/').skip(1);
        match (slots.next(), slots.next()) {
            (None, _) => Self::Vertex,
            (Some(_), None) => Self::VertexTexture,
            (Some(""), Some(_)) => Self::VertexNormal,
            (Some(_), Some(_)) => Self::VertexTextureNormal,
        }
    }

    /// Whether corners in this layout carry a texture slot
    pub const fn has_texture_slot(self) -> bool {
        !matches!(self, Self::Vertex)
    }

    /// Whether corners in this layout carry a normal slot
    pub const fn has_normal_slot(self) -> bool {
        matches!(self, Self::VertexTextureNormal | Self::VertexNormal)
    }
}

/// A polygon face from an `f` record
///
/// Indices are stored exactly as written: 1-based, possibly negative, never
/// checked against the geometry lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// Position index per corner
    pub vertex_indices: Vec<i32>,
    /// Texture coordinate index per corner, empty when the face has none
    pub texture_indices: Vec<i32>,
    /// Normal index per corner, empty when the face has none
    pub normal_indices: Vec<i32>,
    /// Layout detected from the first corner
    pub format: FaceFormat,
    /// Material active when the face was read, empty if none
    pub material: String,
}

impl Face {
    /// Create an empty face
    pub fn new(format: FaceFormat, material: impl Into<String>) -> Self {
        Self {
            vertex_indices: Vec::new(),
            texture_indices: Vec::new(),
            normal_indices: Vec::new(),
            format,
            material: material.into(),
        }
    }

    /// Number of corners
    pub fn corner_count(&self) -> usize {
        self.vertex_indices.len()
    }

    /// Whether texture indices were recorded
    pub fn has_texture_indices(&self) -> bool {
        !self.texture_indices.is_empty()
    }

    /// Whether normal indices were recorded
    pub fn has_normal_indices(&self) -> bool {
        !self.normal_indices.is_empty()
    }
}

/// Parsed OBJ scene
///
/// Geometry records keep every float that appeared on their line, so rows
/// may differ in length. `face_materials[k]` is the material name of
/// `faces[k]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Vertex positions (`v`)
    pub positions: Vec<Vec<f32>>,
    /// Texture coordinates (`vt`)
    pub texture_coords: Vec<Vec<f32>>,
    /// Normals (`vn`)
    pub normals: Vec<Vec<f32>>,
    /// Faces (`f`)
    pub faces: Vec<Face>,
    /// Material name per face, aligned with `faces`
    pub face_materials: Vec<String>,
    /// Materials from the loaded material library
    pub materials: Vec<Material>,
    /// Recovered problems, in the order they were found
    pub warnings: Vec<ParseWarning>,
}

impl Scene {
    /// Look up a material by name
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Material name of a face
    pub fn face_material(&self, face_index: usize) -> Option<&str> {
        self.face_materials.get(face_index).map(String::as_str)
    }

    /// Material record of a face, if its name resolves
    pub fn material_for_face(&self, face_index: usize) -> Option<&Material> {
        self.face_material(face_index).and_then(|name| self.material(name))
    }

    /// Whether any warnings were recorded
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
