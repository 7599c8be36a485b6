//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl files into an ordered list of [`Material`]s.
//! Supports the Phong color properties, dissolve/transparency, the
//! illumination model, and texture map paths (paths are recorded, images are
//! never opened).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::material::{upsert, Color, Material};
use crate::assets::diagnostics::{MalformedField, ParseWarning, RecordContext};
use crate::config::{LoaderConfig, MalformedPolicy};

/// Origin reported for material text that did not come from a file
const INLINE_SOURCE: &str = "<inline mtl>";

/// MTL loading errors
#[derive(Error, Debug)]
pub enum MtlError {
    /// The MTL file could not be opened
    #[error("Failed to open MTL file {}: {source}", .path.display())]
    FileOpen {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Reading a line failed (including invalid UTF-8)
    #[error("Failed to read MTL file {}: {source}", .path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// A record did not parse and the policy is [`MalformedPolicy::Fail`]
    #[error("Malformed record in {}:{line}: {message}", .path.display())]
    MalformedRecord {
        /// File containing the record
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },
}

/// Materials parsed from one MTL source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MtlLibrary {
    /// Materials in order of first definition
    pub materials: Vec<Material>,
    /// Recovered problems
    pub warnings: Vec<ParseWarning>,
}

/// MTL file parser
#[derive(Debug, Clone, Default)]
pub struct MtlParser {
    config: LoaderConfig,
}

impl MtlParser {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given configuration
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load and parse an MTL file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<MtlLibrary, MtlError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MtlError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loading material library {}", path.display());
        self.parse_reader(BufReader::new(file), path)
    }

    /// Parse MTL text held in memory
    pub fn parse(&self, contents: &str) -> Result<MtlLibrary, MtlError> {
        self.parse_reader(contents.as_bytes(), Path::new(INLINE_SOURCE))
    }

    /// Parse MTL records from a reader
    ///
    /// `origin` is only used in diagnostics.
    pub fn parse_reader<R: BufRead>(&self, reader: R, origin: &Path) -> Result<MtlLibrary, MtlError> {
        let mut library = MtlLibrary::default();
        let mut current_material: Option<Material> = None;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| MtlError::Read {
                path: origin.to_path_buf(),
                source,
            })?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let ctx = RecordContext {
                path: origin,
                line: line_num + 1,
                policy: self.config.malformed_policy,
            };

            Self::parse_record(line, &ctx, &mut current_material, &mut library)
                .map_err(|field| MtlError::MalformedRecord {
                    path: origin.to_path_buf(),
                    line: field.line,
                    message: field.message,
                })?;
        }

        // Flush the final material
        if let Some(mat) = current_material {
            upsert(&mut library.materials, mat);
        }

        log::debug!(
            "Parsed {} material(s) from {}",
            library.materials.len(),
            origin.display()
        );
        Ok(library)
    }

    fn parse_record(
        line: &str,
        ctx: &RecordContext<'_>,
        current_material: &mut Option<Material>,
        library: &mut MtlLibrary,
    ) -> Result<(), MalformedField> {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };
        let warnings = &mut library.warnings;

        if command == "newmtl" {
            if let Some(mat) = current_material.take() {
                upsert(&mut library.materials, mat);
            }

            let name = rest_of_line(line, command);
            if name.is_empty() {
                ctx.malformed("newmtl: missing material name".to_string(), warnings)?;
            }
            *current_material = Some(Material::new(name));
            return Ok(());
        }

        let Some(mat) = current_material.as_mut() else {
            log::trace!("{}:{}: '{}' before any newmtl, ignored", ctx.path.display(), ctx.line, command);
            return Ok(());
        };

        match command {
            "Kd" => {
                if let Some(color) = Self::parse_color(&mut tokens, ctx, command, warnings)? {
                    mat.diffuse = color;
                }
            }
            "Ka" => {
                if let Some(color) = Self::parse_color(&mut tokens, ctx, command, warnings)? {
                    mat.ambient = color;
                }
            }
            "Ks" => {
                if let Some(color) = Self::parse_color(&mut tokens, ctx, command, warnings)? {
                    mat.specular = color;
                }
            }
            "Ke" => {
                if let Some(color) = Self::parse_color(&mut tokens, ctx, command, warnings)? {
                    mat.emission = color;
                }
            }
            "Ns" => {
                if let Some(value) = ctx.number(tokens.next(), command, warnings)? {
                    mat.shininess = value;
                }
            }
            "d" => {
                if let Some(value) = ctx.number(tokens.next(), command, warnings)? {
                    mat.dissolve = value;
                }
            }
            "Tr" => {
                // Transparency (inverted dissolve): Tr = 1.0 - d
                if let Some(value) = ctx.number::<f32>(tokens.next(), command, warnings)? {
                    mat.dissolve = 1.0 - value;
                }
            }
            "illum" => {
                if let Some(value) = ctx.number(tokens.next(), command, warnings)? {
                    mat.illumination_model = Some(value);
                }
            }
            "map_Kd" | "map_Ka" | "map_Ks" | "map_Ke" | "map_Bump" | "bump" => {
                // Texture paths may contain spaces, take the rest of the line
                let path = rest_of_line(line, command);
                if path.is_empty() {
                    ctx.malformed(format!("{command}: missing texture path"), warnings)?;
                    return Ok(());
                }
                let slot = match command {
                    "map_Kd" => &mut mat.diffuse_map,
                    "map_Ka" => &mut mat.ambient_map,
                    "map_Ks" => &mut mat.specular_map,
                    "map_Ke" => &mut mat.emission_map,
                    _ => &mut mat.bump_map,
                };
                *slot = Some(path.to_string());
            }
            // Ignore unknown commands silently
            _ => {}
        }

        Ok(())
    }

    /// Parse exactly three color components
    ///
    /// Under [`MalformedPolicy::Skip`] a bad component leaves the whole color
    /// unchanged; under `ZeroFill` the bad component becomes zero.
    fn parse_color<'a, I>(
        tokens: &mut I,
        ctx: &RecordContext<'_>,
        command: &str,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Option<Color>, MalformedField>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut color = [0.0; 3];
        let mut complete = true;
        for component in &mut color {
            match ctx.number(tokens.next(), command, warnings)? {
                Some(value) => *component = value,
                None => complete = false,
            }
        }

        Ok((complete || ctx.policy != MalformedPolicy::Skip).then_some(color))
    }
}

/// Everything after the leading keyword, trimmed
pub(crate) fn rest_of_line<'a>(line: &'a str, keyword: &str) -> &'a str {
    line.trim_start()
        .strip_prefix(keyword)
        .unwrap_or_default()
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(contents: &str) -> MtlLibrary {
        MtlParser::new().parse(contents).unwrap()
    }

    #[test]
    fn test_parse_simple_material() {
        let mtl_content = r#"
# Simple material
newmtl TestMaterial
Ka 1.0 1.0 1.0
Kd 0.8 0.2 0.2
Ks 0.5 0.5 0.5
Ns 250.0
d 1.0
illum 2
"#;

        let library = parse(mtl_content);
        assert_eq!(library.materials.len(), 1);
        assert!(library.warnings.is_empty());

        let mat = &library.materials[0];
        assert_eq!(mat.name, "TestMaterial");
        assert_eq!(mat.ambient, [1.0, 1.0, 1.0]);
        assert_eq!(mat.diffuse, [0.8, 0.2, 0.2]);
        assert_eq!(mat.specular, [0.5, 0.5, 0.5]);
        assert_relative_eq!(mat.shininess, 250.0);
        assert_relative_eq!(mat.dissolve, 1.0);
        assert_eq!(mat.illumination_model, Some(2));
    }

    #[test]
    fn test_diffuse_and_shininess_leave_other_defaults() {
        let library = parse("newmtl M1\nKd 1 0 0\nNs 50\n");
        assert_eq!(library.materials.len(), 1);

        let mat = &library.materials[0];
        assert_eq!(mat.name, "M1");
        assert_eq!(mat.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(mat.ambient, [0.0, 0.0, 0.0]);
        assert_relative_eq!(mat.shininess, 50.0);
        assert_relative_eq!(mat.dissolve, 1.0);
    }

    #[test]
    fn test_material_without_properties_has_defaults() {
        let library = parse("newmtl Foo\n");
        assert_eq!(library.materials, vec![Material::new("Foo")]);
    }

    #[test]
    fn test_parse_multiple_materials_in_order() {
        let mtl_content = r#"
newmtl Material2
Kd 0.0 1.0 0.0
Ns 10

newmtl Material1
Kd 1.0 0.0 0.0
"#;

        let library = parse(mtl_content);
        let names: Vec<&str> = library.materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Material2", "Material1"]);

        assert_eq!(library.materials[0].diffuse, [0.0, 1.0, 0.0]);
        assert_relative_eq!(library.materials[0].shininess, 10.0);
        assert_eq!(library.materials[1].diffuse, [1.0, 0.0, 0.0]);
        assert_relative_eq!(library.materials[1].shininess, 0.0);
    }

    #[test]
    fn test_redefined_name_replaces_in_place() {
        let library = parse("newmtl A\nNs 1\nnewmtl B\nnewmtl A\nNs 2\n");

        let names: Vec<&str> = library.materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_relative_eq!(library.materials[0].shininess, 2.0);
    }

    #[test]
    fn test_properties_before_newmtl_are_ignored() {
        let library = parse("Kd 1 1 1\nNs 5\nnewmtl A\n");
        assert_eq!(library.materials, vec![Material::new("A")]);
        assert!(library.warnings.is_empty());
    }

    #[test]
    fn test_parse_material_with_textures() {
        let mtl_content = r#"
newmtl TexturedMaterial
Kd 1.0 1.0 1.0
map_Kd textures/my diffuse.png
map_Bump textures/normal.png
map_Ke textures/emission.png
"#;

        let library = parse(mtl_content);
        let mat = &library.materials[0];

        assert_eq!(mat.diffuse_map.as_deref(), Some("textures/my diffuse.png"));
        assert_eq!(mat.bump_map.as_deref(), Some("textures/normal.png"));
        assert_eq!(mat.emission_map.as_deref(), Some("textures/emission.png"));
        assert_eq!(mat.specular_map, None);
    }

    #[test]
    fn test_parse_transparency() {
        let library = parse("newmtl TransparentMat\nTr 0.3\n");
        let mat = &library.materials[0];

        // Tr = 1.0 - d, so Tr 0.3 means d = 0.7
        assert_relative_eq!(mat.dissolve, 0.7, epsilon = 1e-6);
        assert!(mat.is_transparent());
    }

    #[test]
    fn test_parse_emission() {
        let library = parse("newmtl EmissiveMat\nKe 0.2 0.6 1.0\n");
        assert_eq!(library.materials[0].emission, [0.2, 0.6, 1.0]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let library = parse("newmtl Win\r\nKd 0.5 0.5 0.5\r\nd 0.25\r\n");
        let mat = &library.materials[0];

        assert_eq!(mat.name, "Win");
        assert_eq!(mat.diffuse, [0.5, 0.5, 0.5]);
        assert_relative_eq!(mat.dissolve, 0.25);
    }

    #[test]
    fn test_malformed_color_skipped() {
        let library = parse("newmtl A\nKd 0.1 0.2 0.3\nKd 1 oops 1\nNs abc\n");
        let mat = &library.materials[0];

        assert_eq!(mat.diffuse, [0.1, 0.2, 0.3]);
        assert_relative_eq!(mat.shininess, 0.0);
        assert_eq!(library.warnings.len(), 2);
        assert!(matches!(
            &library.warnings[0],
            ParseWarning::MalformedRecord { line: 3, .. }
        ));
    }

    #[test]
    fn test_malformed_color_zero_filled() {
        let config = LoaderConfig::new().with_malformed_policy(MalformedPolicy::ZeroFill);
        let library = MtlParser::with_config(config)
            .parse("newmtl A\nKd 1 oops\n")
            .unwrap();

        assert_eq!(library.materials[0].diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(library.warnings.len(), 2);
    }

    #[test]
    fn test_malformed_fails_under_fail_policy() {
        let config = LoaderConfig::new().with_malformed_policy(MalformedPolicy::Fail);
        let result = MtlParser::with_config(config).parse("newmtl A\n\nd half\n");

        match result {
            Err(MtlError::MalformedRecord { line, message, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(message, "d: invalid number 'half'");
            }
            other => panic!("expected malformed record error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let result = MtlParser::new().load("does/not/exist.mtl");
        match result {
            Err(err @ MtlError::FileOpen { .. }) => {
                assert!(err.to_string().contains("does/not/exist.mtl"));
            }
            other => panic!("expected open error, got {other:?}"),
        }
    }

    #[test]
    fn test_rest_of_line() {
        assert_eq!(rest_of_line("  usemtl  Red Paint  ", "usemtl"), "Red Paint");
        assert_eq!(rest_of_line("usemtl", "usemtl"), "");
    }
}
