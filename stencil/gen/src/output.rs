//! Validation, formatting and atomic writing of generated files.
//!
//! ## Safety Guarantees
//!
//! - **Validation**: Assembled artifacts are parsed with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Files are written to a sibling temp file and renamed
//!   into place, so a target path only ever holds complete content

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;

use crate::errors::GeneratorError;

/// Validates generated code using syn.
///
/// ## Errors
///
/// Returns `GeneratorError::Content` if the code fails to parse as a file.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::Content(format!("Generated code is invalid: {}", e)))
}

/// Formats a parsed file, prepending the generated-file notice.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by stencil-gen. Do not edit manually.\n\n{}",
        formatted
    )
}

/// The temp file a write to `path` goes through before it is renamed.
pub fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns `GeneratorError::Io` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e))?;
    }

    let temp = temp_path(path);
    fs::write(&temp, content).map_err(|e| GeneratorError::io(&temp, e))?;

    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        GeneratorError::io(path, e)
    })
}
