//! Material library subsystem
//!
//! MTL parsing into ordered [`Material`] records.

pub mod material;
pub mod mtl_parser;

pub use material::{Material, Color};
pub use mtl_parser::{MtlParser, MtlLibrary, MtlError};
