//! Output directory layout.
//!
//! Artifacts land in a directory derived from a dotted package name:
//!
//! ```text
//! <source root>/
//! └── spec/tests/rest/          # package "spec.tests.rest"
//!     ├── users_tests.rs
//!     └── orders_tests.rs
//! <resource root>/
//! └── spec/tests/rest/
//!     └── stencil-spec-stencil
//! ```
//!
//! The roots are validated once per run by [`OutputRoots::new`]; package
//! directories are created on demand.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::GeneratorError;

/// Makes sure `path` exists as a directory, creating it and its ancestors.
///
/// Calling this again for the same path is a no-op. If creation fails but the
/// directory exists afterwards (another process created it), that counts as
/// success.
///
/// ## Errors
///
/// Returns `GeneratorError::Configuration` naming `label` if the path is
/// empty, exists as something other than a directory, or cannot be created.
pub fn ensure_directory(path: &Path, label: &str) -> Result<(), GeneratorError> {
    if path.as_os_str().is_empty() {
        return Err(GeneratorError::configuration(label, "is not defined"));
    }
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(GeneratorError::configuration(
            label,
            format!("is not a directory: {}", path.display()),
        ));
    }

    match fs::create_dir_all(path) {
        Ok(()) => {
            debug!(path = %path.display(), "created directory");
            Ok(())
        }
        Err(_) if path.is_dir() => Ok(()),
        Err(e) => Err(GeneratorError::configuration(
            label,
            format!(
                "does not exist and cannot be created: {} ({})",
                path.display(),
                e
            ),
        )),
    }
}

/// Converts a dotted package name into a relative path.
///
/// An empty name maps to an empty path (the root itself).
///
/// ## Examples
///
/// ```
/// use std::path::PathBuf;
/// use stencil_gen::layout::package_path;
///
/// assert_eq!(package_path("spec.tests.rest").unwrap(), PathBuf::from("spec/tests/rest"));
/// assert_eq!(package_path("").unwrap(), PathBuf::new());
/// assert!(package_path("spec..rest").is_err());
/// ```
///
/// ## Errors
///
/// Returns `GeneratorError::Configuration` if a segment is empty or
/// contains a path separator or whitespace.
pub fn package_path(dotted_name: &str) -> Result<PathBuf, GeneratorError> {
    let trimmed = dotted_name.trim();
    if trimmed.is_empty() {
        return Ok(PathBuf::new());
    }

    trimmed
        .split('.')
        .map(|segment| {
            let invalid = segment.is_empty()
                || segment.contains(['/', '\\'])
                || segment.chars().any(char::is_whitespace);
            if invalid {
                Err(GeneratorError::configuration(
                    "Package name",
                    format!("'{}' has an invalid segment '{}'", dotted_name, segment),
                ))
            } else {
                Ok(segment)
            }
        })
        .collect()
}

/// Resolves the directory for `dotted_name` under `root`, creating it.
///
/// ## Errors
///
/// Returns `GeneratorError::Configuration` if the package name is invalid or
/// the directory cannot be created.
pub fn resolve_package_path(root: &Path, dotted_name: &str) -> Result<PathBuf, GeneratorError> {
    let dir = root.join(package_path(dotted_name)?);
    ensure_directory(&dir, "Package directory")?;
    Ok(dir)
}

/// The two destination roots of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoots {
    source: PathBuf,
    resource: PathBuf,
}

impl OutputRoots {
    /// Validates both roots, creating them if needed.
    ///
    /// The resource root defaults to the source root.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Configuration` if either root is unusable.
    pub fn new(source: &Path, resource: Option<&Path>) -> Result<Self, GeneratorError> {
        ensure_directory(source, "Sources output")?;
        if let Some(resource) = resource {
            ensure_directory(resource, "Resources output")?;
        }

        Ok(Self {
            source: source.to_path_buf(),
            resource: resource.unwrap_or(source).to_path_buf(),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn resource(&self) -> &Path {
        &self.resource
    }

    pub fn sources_package_dir(&self, package: &str) -> Result<PathBuf, GeneratorError> {
        resolve_package_path(&self.source, package)
    }

    pub fn resources_package_dir(&self, package: &str) -> Result<PathBuf, GeneratorError> {
        resolve_package_path(&self.resource, package)
    }
}
