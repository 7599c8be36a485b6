//! Asset parsing: OBJ scenes and MTL material libraries

pub mod diagnostics;
pub mod geometry;
pub mod materials;
pub mod obj_parser;
pub mod scene;

pub use diagnostics::ParseWarning;
pub use geometry::GeometryAccumulator;
pub use materials::{Color, Material, MtlError, MtlLibrary, MtlParser};
pub use obj_parser::{ObjError, ObjParser};
pub use scene::{Face, FaceFormat, Scene};

use std::path::Path;

/// Load an OBJ file with the default configuration
///
/// # Example
/// ```no_run
/// let scene = wavefront_scene::assets::load_obj("models/teapot.obj")?;
/// for (face, material) in scene.faces.iter().zip(&scene.face_materials) {
///     println!("{} corners, material '{}'", face.corner_count(), material);
/// }
/// # Ok::<(), wavefront_scene::assets::ObjError>(())
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Scene, ObjError> {
    ObjParser::new().load(path)
}

/// Load an MTL file with the default configuration
pub fn load_mtl<P: AsRef<Path>>(path: P) -> Result<MtlLibrary, MtlError> {
    MtlParser::new().load(path)
}
