//! Artifact and member naming.
//!
//! Service and method names in a project definition are free-form ("user
//! service", "listItems", "HTTPClient"). This module turns them into Rust
//! identifiers and file names deterministically:
//!
//! - "user service" + suffix "Tests" -> class `UserServiceTests`, file `user_service_tests.rs`
//! - "HTTPClient" + suffix "Schema" -> class `HTTPClientSchema`, file `http_client_schema.rs`
//!
//! Letters and digits of any script survive; everything else separates
//! words. Case mapping uses the Unicode tables only, so the result is the
//! same under every locale.

use crate::errors::GeneratorError;
use crate::source::identifier;

/// The derived names of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    /// Type name declared inside the artifact (PascalCase).
    pub class_name: String,
    /// File name of the artifact (`snake_case.rs`).
    pub file_name: String,
}

/// Derives artifact names from service names by appending a fixed suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingStrategy {
    suffix: &'static str,
}

impl NamingStrategy {
    pub const fn with_suffix(suffix: &'static str) -> Self {
        Self { suffix }
    }

    pub fn suffix(&self) -> &'static str {
        self.suffix
    }

    /// Derives the class and file name for a service.
    ///
    /// ## Examples
    ///
    /// ```
    /// use stencil_gen::naming::NamingStrategy;
    ///
    /// let name = NamingStrategy::with_suffix("Tests").artifact_name("user service").unwrap();
    /// assert_eq!(name.class_name, "UserServiceTests");
    /// assert_eq!(name.file_name, "user_service_tests.rs");
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Validation` if the name has no letters or
    /// digits, starts with a digit, or does not form a Rust identifier.
    pub fn artifact_name(&self, service_name: &str) -> Result<ArtifactName, GeneratorError> {
        let mut words = split_words(service_name);
        if words.is_empty() {
            return Err(GeneratorError::Validation(format!(
                "service name '{}' contains no usable characters",
                service_name
            )));
        }
        if words[0].starts_with(char::is_numeric) {
            return Err(GeneratorError::Validation(format!(
                "service name '{}' must not start with a digit",
                service_name
            )));
        }
        words.extend(split_words(self.suffix));

        let class_name = join_pascal(&words);
        identifier(&class_name).map_err(|_| {
            GeneratorError::Validation(format!(
                "service name '{}' does not form a valid type name '{}'",
                service_name, class_name
            ))
        })?;

        Ok(ArtifactName {
            class_name,
            file_name: format!("{}.rs", join_snake(&words)),
        })
    }
}

/// Converts a free-form name to `snake_case`.
///
/// Returns an empty string if the name has no letters or digits.
pub fn to_snake_case(name: &str) -> String {
    join_snake(&split_words(name))
}

/// Splits a name into words on non-alphanumeric characters and CamelCase
/// boundaries.
fn split_words(name: &str) -> Vec<&str> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|chunk| !chunk.is_empty())
        .flat_map(split_camel_case)
        .collect()
}

fn join_pascal(words: &[&str]) -> String {
    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn join_snake(words: &[&str]) -> String {
    words
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Splits a CamelCase string into individual words.
///
/// - "ListItems" -> ["List", "Items"]
/// - "OpenAI" -> ["Open", "AI"]
/// - "HTTPClient" -> ["HTTP", "Client"]
/// - "users" -> ["users"]
fn split_camel_case(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut word_start = 0;
    let chars: Vec<(usize, char)> = s.char_indices().collect();

    for i in 1..chars.len() {
        let (offset, current) = chars[i];
        let prev = chars[i - 1].1;

        // "listItems" -> "list", "Items"; "HTTPClient" -> "HTTP", "Client"
        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase()
                || prev.is_numeric()
                || (i + 1 < chars.len() && chars[i + 1].1.is_lowercase() && prev.is_uppercase()));

        if is_new_word {
            if offset > word_start {
                words.push(&s[word_start..offset]);
            }
            word_start = offset;
        }
    }

    if word_start < s.len() {
        words.push(&s[word_start..]);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    // === split_camel_case tests ===

    #[test]
    fn split_camel_case_multi_word() {
        assert_eq!(split_camel_case("ListItems"), vec!["List", "Items"]);
        assert_eq!(split_camel_case("listItems"), vec!["list", "Items"]);
    }

    #[test]
    fn split_camel_case_with_acronym() {
        assert_eq!(split_camel_case("OpenAI"), vec!["Open", "AI"]);
        assert_eq!(split_camel_case("HTTPClient"), vec!["HTTP", "Client"]);
    }

    #[test]
    fn split_camel_case_digit_boundary() {
        assert_eq!(split_camel_case("V2Users"), vec!["V2", "Users"]);
    }

    #[test]
    fn split_camel_case_single_word() {
        assert_eq!(split_camel_case("users"), vec!["users"]);
        assert_eq!(split_camel_case(""), Vec::<&str>::new());
    }

    // === case conversion tests ===

    #[test]
    fn snake_case_from_mixed_input() {
        assert_eq!(to_snake_case("ListItems"), "list_items");
        assert_eq!(to_snake_case("get user-by id"), "get_user_by_id");
        assert_eq!(to_snake_case("HTTPClient"), "http_client");
        assert_eq!(to_snake_case("--"), "");
    }

    #[test]
    fn non_ascii_letters_are_kept() {
        assert_eq!(to_snake_case("caféBar"), "café_bar");
        assert_eq!(to_snake_case("ÜberCafé"), "über_café");
        assert_eq!(split_camel_case("ЗаказыКлиента"), vec!["Заказы", "Клиента"]);
    }

    // === NamingStrategy tests ===

    #[test]
    fn artifact_name_appends_suffix() {
        let naming = NamingStrategy::with_suffix("Tests");
        let name = naming.artifact_name("Alpha").unwrap();

        assert_eq!(name.class_name, "AlphaTests");
        assert_eq!(name.file_name, "alpha_tests.rs");
    }

    #[test]
    fn artifact_name_capitalizes_words() {
        let naming = NamingStrategy::with_suffix("Schema");
        let name = naming.artifact_name("  order history ").unwrap();

        assert_eq!(name.class_name, "OrderHistorySchema");
        assert_eq!(name.file_name, "order_history_schema.rs");
    }

    #[test]
    fn artifact_name_accepts_non_ascii_names() {
        let naming = NamingStrategy::with_suffix("Tests");

        let orders = naming.artifact_name("Заказы").unwrap();
        assert_eq!(orders.class_name, "ЗаказыTests");
        assert_eq!(orders.file_name, "заказы_tests.rs");

        let cafe = naming.artifact_name("Café").unwrap();
        let caf = naming.artifact_name("Caf").unwrap();
        assert_eq!(cafe.file_name, "café_tests.rs");
        assert_ne!(cafe.file_name, caf.file_name);
    }

    #[test]
    fn artifact_name_rejects_non_identifier_characters() {
        let naming = NamingStrategy::with_suffix("Tests");

        // Superscript digits are alphanumeric but not identifier characters
        assert!(matches!(
            naming.artifact_name("x²"),
            Err(GeneratorError::Validation(_))
        ));
    }

    #[test]
    fn artifact_name_is_deterministic() {
        let naming = NamingStrategy::with_suffix("Tests");
        assert_eq!(
            naming.artifact_name("Users API").unwrap(),
            naming.artifact_name("Users API").unwrap()
        );
    }

    #[test]
    fn artifact_name_rejects_unusable_names() {
        let naming = NamingStrategy::with_suffix("Tests");

        assert!(matches!(
            naming.artifact_name("!!!"),
            Err(GeneratorError::Validation(_))
        ));
        assert!(matches!(
            naming.artifact_name("2fa"),
            Err(GeneratorError::Validation(_))
        ));
    }
}
