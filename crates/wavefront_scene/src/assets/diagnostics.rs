//! Non-fatal parse diagnostics and numeric field parsing
//!
//! Both parsers read numbers the same way: a token either parses, or the
//! configured [`MalformedPolicy`] decides whether the field is dropped, zeroed,
//! or turned into a hard error. Recovered problems become [`ParseWarning`]s.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MalformedPolicy;

/// A recovered problem encountered while parsing
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseWarning {
    /// An `mtllib` record named a file that does not exist
    #[error("Material library not found: {}", .path.display())]
    MissingMaterialLibrary {
        /// Resolved library path
        path: PathBuf,
    },

    /// An `mtllib` file exists but could not be loaded
    #[error("Material library {} could not be loaded: {message}", .path.display())]
    UnreadableMaterialLibrary {
        /// Resolved library path
        path: PathBuf,
        /// Underlying failure
        message: String,
    },

    /// A field did not parse and was skipped or zero-filled
    #[error("{}:{line}: {message}", .path.display())]
    MalformedRecord {
        /// File containing the record
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },
}

/// A malformed field that the policy turned into a hard failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MalformedField {
    pub line: usize,
    pub message: String,
}

/// Location and policy for the record currently being parsed
pub(crate) struct RecordContext<'a> {
    pub path: &'a Path,
    pub line: usize,
    pub policy: MalformedPolicy,
}

impl RecordContext<'_> {
    /// Report a malformed field according to the policy
    ///
    /// Returns `Ok(())` when the problem was recorded as a warning.
    pub fn malformed(
        &self,
        message: String,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<(), MalformedField> {
        if self.policy == MalformedPolicy::Fail {
            return Err(MalformedField { line: self.line, message });
        }

        log::warn!("{}:{}: {}", self.path.display(), self.line, message);
        warnings.push(ParseWarning::MalformedRecord {
            path: self.path.to_path_buf(),
            line: self.line,
            message,
        });
        Ok(())
    }

    /// Parse one numeric token
    ///
    /// `Ok(None)` means the field was skipped.
    pub fn number<T>(
        &self,
        token: Option<&str>,
        what: &str,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Option<T>, MalformedField>
    where
        T: FromStr + Default,
    {
        let message = match token {
            Some(token) => match token.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => format!("{what}: invalid number '{token}'"),
            },
            None => format!("{what}: missing value"),
        };

        self.malformed(message, warnings)?;
        Ok(match self.policy {
            MalformedPolicy::ZeroFill => Some(T::default()),
            MalformedPolicy::Skip | MalformedPolicy::Fail => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(policy: MalformedPolicy) -> RecordContext<'static> {
        RecordContext { path: Path::new("model.obj"), line: 7, policy }
    }

    #[test]
    fn test_valid_number_has_no_warning() {
        let mut warnings = Vec::new();
        let value: Option<f32> = context(MalformedPolicy::Fail)
            .number(Some("1.5"), "v", &mut warnings)
            .unwrap();

        assert_eq!(value, Some(1.5));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_skip_policy_drops_field() {
        let mut warnings = Vec::new();
        let value: Option<f32> = context(MalformedPolicy::Skip)
            .number(Some("abc"), "v", &mut warnings)
            .unwrap();

        assert_eq!(value, None);
        assert_eq!(warnings, vec![ParseWarning::MalformedRecord {
            path: PathBuf::from("model.obj"),
            line: 7,
            message: "v: invalid number 'abc'".to_string(),
        }]);
    }

    #[test]
    fn test_zero_fill_policy() {
        let mut warnings = Vec::new();
        let value: Option<i32> = context(MalformedPolicy::ZeroFill)
            .number(None, "f", &mut warnings)
            .unwrap();

        assert_eq!(value, Some(0));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_fail_policy_reports_line() {
        let mut warnings = Vec::new();
        let result: Result<Option<f32>, _> = context(MalformedPolicy::Fail)
            .number(Some("x"), "Kd", &mut warnings);

        let err = result.unwrap_err();
        assert_eq!(err.line, 7);
        assert_eq!(err.message, "Kd: invalid number 'x'");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_warning_display_includes_path() {
        let warning = ParseWarning::MissingMaterialLibrary { path: PathBuf::from("dir/lib.mtl") };
        assert_eq!(warning.to_string(), "Material library not found: dir/lib.mtl");
    }
}
