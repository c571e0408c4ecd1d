//! Generator options.
//!
//! Options are usually loaded from a TOML file and then overridden from the
//! command line:
//!
//! ```toml
//! source_output_dir = "generated/src"
//! resource_output_dir = "generated/resources"
//! package_name = "acme.api.tests"
//! naming_prefix = "acme"
//! kind = "schema"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::GeneratorError;
use crate::strategy::GeneratorKind;

fn default_naming_prefix() -> String {
    "stencil".to_string()
}

fn default_write_spec() -> bool {
    true
}

/// Options controlling where and what the generator writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Root directory for generated source artifacts. Created if absent.
    pub source_output_dir: PathBuf,
    /// Root directory for the companion resource file.
    ///
    /// Falls back to `source_output_dir` when unset.
    #[serde(default)]
    pub resource_output_dir: Option<PathBuf>,
    /// Dotted package name; each segment becomes one directory level.
    #[serde(default)]
    pub package_name: Option<String>,
    /// Distinguishes companion resource files of different generator runs.
    #[serde(default = "default_naming_prefix")]
    pub naming_prefix: String,
    /// Which artifact family to generate.
    #[serde(default)]
    pub kind: GeneratorKind,
    /// Whether to write the project model as a companion resource file.
    #[serde(default = "default_write_spec")]
    pub write_spec: bool,
}

impl GeneratorOptions {
    /// Variable key that is never injected as a binding.
    ///
    /// It names the directory the project definition was loaded from, which
    /// has no meaning inside a generated artifact.
    pub const RESERVED_VARIABLE: &'static str = "baseDir";

    /// Package used when `package_name` is unset.
    pub const DEFAULT_PACKAGE_NAME: &'static str = "spec.tests.rest";

    /// Fixed leading token of companion resource file names.
    pub const SPEC_NAME: &'static str = "stencil-spec";

    pub fn new(source_output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_output_dir: source_output_dir.into(),
            resource_output_dir: None,
            package_name: None,
            naming_prefix: default_naming_prefix(),
            kind: GeneratorKind::default(),
            write_spec: default_write_spec(),
        }
    }

    /// The effective package name.
    pub fn package_name(&self) -> &str {
        self.package_name
            .as_deref()
            .unwrap_or(Self::DEFAULT_PACKAGE_NAME)
    }

    /// File name of the companion resource, e.g. `stencil-spec-acme`.
    pub fn spec_file_name(&self) -> String {
        format!("{}-{}", Self::SPEC_NAME, self.naming_prefix)
    }

    /// Checks settings that end up as path components.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Configuration` if `naming_prefix` contains a
    /// path separator or `..`.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let prefix = &self.naming_prefix;
        if prefix.contains(['/', '\\']) || prefix.contains("..") {
            return Err(GeneratorError::configuration(
                "Naming prefix",
                format!("'{}' must not contain path separators or '..'", prefix),
            ));
        }
        Ok(())
    }

    /// Parses options from TOML text.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Configuration` if the text is not valid TOML
    /// or does not describe generator options.
    pub fn from_toml_str(content: &str) -> Result<Self, GeneratorError> {
        toml::from_str(content)
            .map_err(|e| GeneratorError::configuration("Generator options", e.to_string()))
    }

    /// Reads and parses an options file.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Configuration` if the file cannot be read or
    /// parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, GeneratorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeneratorError::configuration(
                "Generator options",
                format!("cannot be read from {}: {}", path.display(), e),
            )
        })?;
        Self::from_toml_str(&content)
    }
}
