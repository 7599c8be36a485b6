//! Material record (Wavefront Phong model)

use serde::{Deserialize, Serialize};

/// RGB color triple as written in MTL files
pub type Color = [f32; 3];

/// A named surface material defined by an MTL `newmtl` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name, unique within a material list
    pub name: String,
    /// Diffuse color (Kd)
    pub diffuse: Color,
    /// Ambient color (Ka)
    pub ambient: Color,
    /// Specular color (Ks)
    pub specular: Color,
    /// Emission color (Ke)
    pub emission: Color,
    /// Specular exponent (Ns)
    pub shininess: f32,
    /// Dissolve/opacity (d) - 0.0 = transparent, 1.0 = opaque
    pub dissolve: f32,
    /// Illumination model (illum), if given
    pub illumination_model: Option<u32>,
    /// Diffuse texture map (map_Kd)
    pub diffuse_map: Option<String>,
    /// Ambient texture map (map_Ka)
    pub ambient_map: Option<String>,
    /// Specular texture map (map_Ks)
    pub specular_map: Option<String>,
    /// Emission texture map (map_Ke)
    pub emission_map: Option<String>,
    /// Bump map (map_Bump or bump)
    pub bump_map: Option<String>,
}

impl Material {
    /// Create a material with the given name and default properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the material is partially transparent
    pub fn is_transparent(&self) -> bool {
        self.dissolve < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse: [0.0; 3],
            ambient: [0.0; 3],
            specular: [0.0; 3],
            emission: [0.0; 3],
            shininess: 0.0,
            dissolve: 1.0,
            illumination_model: None,
            diffuse_map: None,
            ambient_map: None,
            specular_map: None,
            emission_map: None,
            bump_map: None,
        }
    }
}

/// Insert a material keyed by name
///
/// A new name is appended; an existing name is replaced where it was first defined.
pub(crate) fn upsert(materials: &mut Vec<Material>, material: Material) {
    match materials.iter_mut().find(|m| m.name == material.name) {
        Some(existing) => *existing = material,
        None => materials.push(material),
    }
}
