//! Configuration system
//!
//! [`LoaderConfig`] controls the parser policies that the OBJ/MTL formats leave
//! open: how repeated `mtllib` records combine, what happens to fields that do
//! not parse, and how face formats are detected. Every default reproduces the
//! permissive behavior of the classic loaders.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// On-disk encodings a configuration file may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration file support, keyed on the file extension
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Write configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// How materials from successive `mtllib` records are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaterialLibraryMode {
    /// The most recently loaded library replaces the material list wholesale
    #[default]
    Replace,
    /// New materials are appended; a redefined name replaces the earlier record in place
    Merge,
}

/// What to do with a numeric field that fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MalformedPolicy {
    /// Drop the offending field and keep the rest of the record
    #[default]
    Skip,
    /// Store zero in place of the offending field
    ZeroFill,
    /// Abort the parse with a malformed-record error
    Fail,
}

/// How the slot layout of a face line is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaceFormatDetection {
    /// The first corner's slash count decides the layout of every corner
    #[default]
    FirstCorner,
    /// Each corner decides its own slots
    PerCorner,
}

/// Parser configuration shared by the OBJ and MTL parsers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Whether `mtllib` records load their material library
    pub load_material_libraries: bool,
    /// How repeated `mtllib` records combine
    pub material_library_mode: MaterialLibraryMode,
    /// Handling of numeric fields that do not parse
    pub malformed_policy: MalformedPolicy,
    /// Face format detection strategy
    pub face_format_detection: FaceFormatDetection,
}

impl LoaderConfig {
    /// Create a loader configuration with the default policies
    pub fn new() -> Self {
        Self {
            load_material_libraries: true,
            material_library_mode: MaterialLibraryMode::Replace,
            malformed_policy: MalformedPolicy::Skip,
            face_format_detection: FaceFormatDetection::FirstCorner,
        }
    }

    /// Enable or disable `mtllib` loading
    pub fn with_material_libraries(mut self, enabled: bool) -> Self {
        self.load_material_libraries = enabled;
        self
    }

    /// Set the `mtllib` combination mode
    pub fn with_material_library_mode(mut self, mode: MaterialLibraryMode) -> Self {
        self.material_library_mode = mode;
        self
    }

    /// Set the malformed field policy
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    /// Set the face format detection strategy
    pub fn with_face_format_detection(mut self, detection: FaceFormatDetection) -> Self {
        self.face_format_detection = detection;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for LoaderConfig {}
