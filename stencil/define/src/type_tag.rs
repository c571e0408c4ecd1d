//! Schema type classification.
//!
//! [`TypeTag`] is the closed set of schema types every output backend agrees
//! on. Each tag has exactly one canonical lowercase name, and that name never
//! depends on the host's locale settings.
//!
//! Case folding goes through [`fold_ascii_lowercase`] and nothing else. It
//! lowers the ASCII letters `A-Z` and leaves every other code point alone, so
//! `"INTEGER"` folds to `"integer"` on every machine, including under locales
//! whose lowercase rules map `I` to a dotless `ı`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

/// Folds ASCII letters to lowercase, independent of any locale.
///
/// ## Examples
///
/// ```
/// use stencil_define::fold_ascii_lowercase;
///
/// assert_eq!(fold_ascii_lowercase("INTEGER"), "integer");
/// // Non-ASCII code points are left untouched
/// assert_eq!(fold_ascii_lowercase("İD"), "İd");
/// ```
pub fn fold_ascii_lowercase(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Returned when text does not name a [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type tag '{0}'")]
pub struct UnknownTypeTag(pub String);

/// Schema type tags.
///
/// `Any` marks an unconstrained (generic) type. `File` is not a JSON type at
/// all: some schema dialects use it for binary uploads.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use stencil_define::TypeTag;
///
/// assert_eq!(TypeTag::Integer.canonical_name(), "integer");
/// assert_eq!(TypeTag::from_str("ARRAY").unwrap(), TypeTag::Array);
/// assert!(!TypeTag::File.is_json());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(try_from = "String", into = "&'static str")]
pub enum TypeTag {
    Array,
    Boolean,
    Integer,
    Number,
    Object,
    String,
    Enum,
    Any,
    File,
}

impl TypeTag {
    /// Canonical lowercase name of the tag.
    ///
    /// The names are fixed at compile time; no runtime case conversion is
    /// involved.
    pub fn canonical_name(self) -> &'static str {
        self.into()
    }

    /// Every tag, in declaration order.
    pub fn all() -> impl Iterator<Item = TypeTag> {
        TypeTag::iter()
    }

    /// True for [`TypeTag::Any`].
    pub fn is_generic(self) -> bool {
        matches!(self, TypeTag::Any)
    }

    /// False only for [`TypeTag::File`], which marks a non-JSON upload.
    pub fn is_json(self) -> bool {
        !matches!(self, TypeTag::File)
    }
}

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_ascii_lowercase(s.trim());
        TypeTag::iter()
            .find(|tag| tag.canonical_name() == folded)
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}

impl TryFrom<String> for TypeTag {
    type Error = UnknownTypeTag;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeTag::from_str(&value)
    }
}
