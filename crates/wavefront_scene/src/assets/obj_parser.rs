//! OBJ file parser for 3D scenes
//!
//! Reads an OBJ file line by line, keyed on the first token of each line:
//!
//! - `v`, `vt`, `vn` append one geometry record holding every float on the line
//! - `f` appends a face tagged with the current material name
//! - `usemtl` sets the current material name
//! - `mtllib` loads a material library relative to the OBJ file
//!
//! Anything else, including `#` comments, is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::diagnostics::{MalformedField, ParseWarning, RecordContext};
use super::geometry::GeometryAccumulator;
use super::materials::material::upsert;
use super::materials::mtl_parser::rest_of_line;
use super::materials::{Material, MtlError, MtlParser};
use super::scene::{Face, FaceFormat, Scene};
use crate::config::{FaceFormatDetection, LoaderConfig, MaterialLibraryMode};

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// The OBJ file could not be opened
    #[error("Failed to open OBJ file {}: {source}", .path.display())]
    FileOpen {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Reading a line failed (including invalid UTF-8)
    #[error("Failed to read OBJ file {}: {source}", .path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// A record did not parse and the policy is `MalformedPolicy::Fail`
    #[error("Malformed record in {}:{line}: {message}", .path.display())]
    MalformedRecord {
        /// File containing the record
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// A referenced material library failed under `MalformedPolicy::Fail`
    #[error("Material library error: {0}")]
    MaterialLibrary(#[from] MtlError),
}

/// State threaded through one parse
#[derive(Default)]
struct ParseState {
    geometry: GeometryAccumulator,
    materials: Vec<Material>,
    current_material: String,
    warnings: Vec<ParseWarning>,
}

/// Indices read from one face corner; `None` for an absent or skipped slot
#[derive(Debug, Clone, Copy, Default)]
struct CornerIndices {
    vertex: Option<i32>,
    texture: Option<i32>,
    normal: Option<i32>,
}

/// OBJ file parser
#[derive(Debug, Clone, Default)]
pub struct ObjParser {
    config: LoaderConfig,
}

impl ObjParser {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given configuration
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load an OBJ file and return its scene
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Scene, ObjError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ObjError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loading OBJ file {}", path.display());
        self.parse_reader(BufReader::new(file), path)
    }

    /// Parse OBJ records from a reader
    ///
    /// `origin` names the source in diagnostics; `mtllib` paths are resolved
    /// against its parent directory.
    pub fn parse_reader<R: BufRead>(&self, reader: R, origin: &Path) -> Result<Scene, ObjError> {
        let base_dir = origin.parent().unwrap_or_else(|| Path::new(""));
        let mut state = ParseState::default();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ObjError::Read {
                path: origin.to_path_buf(),
                source,
            })?;

            let ctx = RecordContext {
                path: origin,
                line: line_num + 1,
                policy: self.config.malformed_policy,
            };

            self.parse_line(&line, &ctx, base_dir, &mut state)?;
        }

        log::debug!(
            "Parsed {}: {} positions, {} faces, {} materials, {} warnings",
            origin.display(),
            state.geometry.position_count(),
            state.geometry.face_count(),
            state.materials.len(),
            state.warnings.len(),
        );

        Ok(state.geometry.finish(state.materials, state.warnings))
    }

    fn parse_line(
        &self,
        line: &str,
        ctx: &RecordContext<'_>,
        base_dir: &Path,
        state: &mut ParseState,
    ) -> Result<(), ObjError> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(());
        };
        let to_error = |field: MalformedField| ObjError::MalformedRecord {
            path: ctx.path.to_path_buf(),
            line: field.line,
            message: field.message,
        };

        match keyword {
            "v" => {
                let record = Self::parse_floats(tokens, ctx, keyword, &mut state.warnings).map_err(to_error)?;
                state.geometry.push_position(record);
            }
            "vt" => {
                let record = Self::parse_floats(tokens, ctx, keyword, &mut state.warnings).map_err(to_error)?;
                state.geometry.push_texture_coord(record);
            }
            "vn" => {
                let record = Self::parse_floats(tokens, ctx, keyword, &mut state.warnings).map_err(to_error)?;
                state.geometry.push_normal(record);
            }
            "f" => {
                let face = self
                    .parse_face(tokens, ctx, &state.current_material, &mut state.warnings)
                    .map_err(to_error)?;
                if let Some(face) = face {
                    state.geometry.push_face(face);
                }
            }
            "usemtl" => {
                state.current_material = rest_of_line(line, keyword).to_string();
            }
            "mtllib" => {
                let name = rest_of_line(line, keyword);
                if name.is_empty() {
                    ctx.malformed("mtllib: missing file name".to_string(), &mut state.warnings)
                        .map_err(to_error)?;
                } else if self.config.load_material_libraries {
                    self.load_material_library(&base_dir.join(name), state)?;
                }
            }
            _ => {
                log::trace!("{}:{}: ignoring '{}'", ctx.path.display(), ctx.line, keyword);
            }
        }

        Ok(())
    }

    /// Parse every remaining token as a float
    fn parse_floats<'a, I>(
        tokens: I,
        ctx: &RecordContext<'_>,
        keyword: &str,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Vec<f32>, MalformedField>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut record = Vec::new();
        for token in tokens {
            if let Some(value) = ctx.number(Some(token), keyword, warnings)? {
                record.push(value);
            }
        }
        Ok(record)
    }

    /// Parse the corners of an `f` record
    ///
    /// Returns `None` for a face line without corners, or when a vertex index
    /// was skipped. A texture or normal list is kept only if every corner
    /// supplied that slot, so stored lists always have one index per corner.
    fn parse_face<'a, I>(
        &self,
        corners: I,
        ctx: &RecordContext<'_>,
        material: &str,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Option<Face>, MalformedField>
    where
        I: Iterator<Item = &'a str>,
    {
        let corners: Vec<&str> = corners.collect();
        let Some(first) = corners.first() else {
            ctx.malformed("f: face has no corners".to_string(), warnings)?;
            return Ok(None);
        };

        let face_format = FaceFormat::detect(first);
        let mut parsed = Vec::with_capacity(corners.len());
        for corner in &corners {
            let format = match self.config.face_format_detection {
                FaceFormatDetection::FirstCorner => face_format,
                FaceFormatDetection::PerCorner => FaceFormat::detect(corner),
            };
            parsed.push(Self::parse_corner(corner, format, ctx, warnings)?);
        }

        let Some(vertex_indices) = parsed.iter().map(|c| c.vertex).collect::<Option<Vec<_>>>() else {
            ctx.malformed("f: vertex index skipped, face dropped".to_string(), warnings)?;
            return Ok(None);
        };

        let mut face = Face::new(face_format, material);
        face.vertex_indices = vertex_indices;
        face.texture_indices = Self::complete_slot(&parsed, |c| c.texture, "texture", ctx, warnings)?;
        face.normal_indices = Self::complete_slot(&parsed, |c| c.normal, "normal", ctx, warnings)?;

        Ok(Some(face))
    }

    /// Collect one slot across all corners
    ///
    /// Empty when no corner has the slot. When only some corners have it the
    /// list is dropped and reported.
    fn complete_slot(
        parsed: &[CornerIndices],
        slot: impl Fn(&CornerIndices) -> Option<i32>,
        what: &str,
        ctx: &RecordContext<'_>,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Vec<i32>, MalformedField> {
        let indices: Vec<i32> = parsed.iter().filter_map(&slot).collect();
        if indices.is_empty() || indices.len() == parsed.len() {
            return Ok(indices);
        }

        ctx.malformed(
            format!("f: {what} index missing on {} of {} corners, {what} indices dropped",
                parsed.len() - indices.len(), parsed.len()),
            warnings,
        )?;
        Ok(Vec::new())
    }

    /// Parse one `v`, `v/vt`, `v/vt/vn` or `v//vn` corner
    ///
    /// An empty texture or normal slot contributes no index.
    fn parse_corner(
        corner: &str,
        format: FaceFormat,
        ctx: &RecordContext<'_>,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<CornerIndices, MalformedField> {
        let mut slots = corner.split('/');
        let mut indices = CornerIndices {
            vertex: ctx.number(slots.next(), "f vertex index", warnings)?,
            ..CornerIndices::default()
        };

        let texture_slot = slots.next();
        if format.has_texture_slot() && texture_slot != Some("") {
            indices.texture = ctx.number(texture_slot, "f texture index", warnings)?;
        }

        let normal_slot = slots.next();
        if format.has_normal_slot() && normal_slot != Some("") {
            indices.normal = ctx.number(normal_slot, "f normal index", warnings)?;
        }

        Ok(indices)
    }

    /// Load an `mtllib` file into the parse state
    ///
    /// Missing or unreadable libraries are warnings; the previous materials stay.
    fn load_material_library(&self, path: &Path, state: &mut ParseState) -> Result<(), ObjError> {
        if !path.exists() {
            log::warn!("Material library not found: {}", path.display());
            state.warnings.push(ParseWarning::MissingMaterialLibrary {
                path: path.to_path_buf(),
            });
            return Ok(());
        }

        let library = match MtlParser::with_config(self.config.clone()).load(path) {
            Ok(library) => library,
            Err(err @ MtlError::MalformedRecord { .. }) => return Err(err.into()),
            Err(err) => {
                log::warn!("{err}");
                state.warnings.push(ParseWarning::UnreadableMaterialLibrary {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
                return Ok(());
            }
        };

        state.warnings.extend(library.warnings);
        match self.config.material_library_mode {
            MaterialLibraryMode::Replace => state.materials = library.materials,
            MaterialLibraryMode::Merge => {
                for material in library.materials {
                    upsert(&mut state.materials, material);
                }
            }
        }

        Ok(())
    }
}
