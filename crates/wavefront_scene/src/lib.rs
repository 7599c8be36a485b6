//! # Wavefront Scene
//!
//! Parser for Wavefront OBJ meshes and their MTL material libraries,
//! producing an in-memory [`Scene`](assets::Scene).
//!
//! ## Features
//!
//! - **Geometry**: positions, texture coordinates and normals in file order
//! - **Faces**: `v`, `v/vt`, `v/vt/vn` and `v//vn` corners, tagged with the active material
//! - **Materials**: `mtllib` libraries resolved next to the OBJ file
//! - **Permissive**: malformed fields and missing libraries become warnings (configurable)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wavefront_scene::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LoaderConfig::default().with_material_library_mode(MaterialLibraryMode::Merge);
//!     let scene = ObjParser::with_config(config).load("models/cube.obj")?;
//!
//!     for warning in &scene.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!     println!("{} faces, {} materials", scene.faces.len(), scene.materials.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{
            Face, FaceFormat, Material, MtlError, MtlParser, ObjError, ObjParser,
            ParseWarning, Scene,
        },
        config::{
            Config, FaceFormatDetection, LoaderConfig, MalformedPolicy, MaterialLibraryMode,
        },
    };
}
