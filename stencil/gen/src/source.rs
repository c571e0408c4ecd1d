//! Token-level writer for a single artifact.
//!
//! [`SourceWriter`] collects the pieces of one artifact (package declaration,
//! imports, type declaration, constructor statements, variable bindings and
//! body members) and assembles them into a single `TokenStream` in a fixed
//! order. Emitting goes through `syn` parsing wherever a string becomes an
//! identifier or path, so malformed names surface as errors instead of
//! panics, and through [`string_literal`] wherever a string becomes a literal.
//!
//! ## Assembled Layout
//!
//! ```text
//! //! Generated `UsersTests` artifact for package `spec.tests.rest`.
//! use stencil_runtime::{...};
//!
//! pub struct UsersTests { base: ApiMethods }
//!
//! impl UsersTests {
//!     pub fn new() -> Self { /* constructor statements */ }
//! }
//!
//! impl RestApiMethods for UsersTests {
//!     fn base(&self) -> &ApiMethods { &self.base }
//!     fn prepare_variables(&self, variables: &mut Variables) { /* bindings */ }
//! }
//!
//! impl UsersTests { /* members */ }
//! ```

use std::collections::HashSet;

use proc_macro2::{Ident, Literal, TokenStream};
use quote::quote;

use crate::errors::GeneratorError;

/// Builds a string literal token, escaping quotes, backslashes and control
/// characters.
///
/// ## Examples
///
/// ```
/// use stencil_gen::source::string_literal;
///
/// assert_eq!(string_literal("say \"hi\"").to_string(), r#""say \"hi\"""#);
/// ```
pub fn string_literal(value: &str) -> Literal {
    Literal::string(value)
}

/// Parses `name` as a Rust identifier.
///
/// ## Errors
///
/// Returns `GeneratorError::Content` if `name` is not a valid identifier
/// (including reserved keywords).
pub fn identifier(name: &str) -> Result<Ident, GeneratorError> {
    syn::parse_str::<Ident>(name)
        .map_err(|e| GeneratorError::Content(format!("'{}' is not a valid identifier: {}", name, e)))
}

#[derive(Debug)]
struct TypeDeclaration {
    name: Ident,
    base: syn::Path,
}

/// Accumulates the parts of one artifact.
#[derive(Debug, Default)]
pub struct SourceWriter {
    package_doc: Option<String>,
    imports: Vec<syn::Path>,
    declaration: Option<TypeDeclaration>,
    constructor: Vec<TokenStream>,
    bindings: Vec<TokenStream>,
    members: Vec<TokenStream>,
    member_names: HashSet<String>,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the artifact's identity.
    pub fn emit_package(&mut self, package: &str, class_name: &str) {
        self.package_doc = Some(format!(
            " Generated `{}` artifact for package `{}`.",
            class_name, package
        ));
    }

    /// Adds `use` declarations.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Content` if a path does not parse.
    pub fn emit_imports(&mut self, paths: &[&str]) -> Result<(), GeneratorError> {
        for path in paths {
            let parsed = syn::parse_str::<syn::Path>(path).map_err(|e| {
                GeneratorError::Content(format!("invalid import path '{}': {}", path, e))
            })?;
            self.imports.push(parsed);
        }
        Ok(())
    }

    /// Declares the artifact type and the base capability it implements.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Content` if either name does not parse or a
    /// type was already declared.
    pub fn begin_type(&mut self, name: &str, base: &str) -> Result<(), GeneratorError> {
        if self.declaration.is_some() {
            return Err(GeneratorError::Content(format!(
                "type already declared before '{}'",
                name
            )));
        }
        let base = syn::parse_str::<syn::Path>(base).map_err(|e| {
            GeneratorError::Content(format!("invalid base capability '{}': {}", base, e))
        })?;
        self.declaration = Some(TypeDeclaration {
            name: identifier(name)?,
            base,
        });
        Ok(())
    }

    /// Adds a statement to the constructor body; `base` is in scope.
    pub fn emit_constructor_statement(&mut self, statement: TokenStream) {
        self.constructor.push(statement);
    }

    /// Adds a statement to `prepare_variables`; `variables` is in scope.
    pub fn emit_binding_statement(&mut self, statement: TokenStream) {
        self.bindings.push(statement);
    }

    /// Adds an item to the artifact's body.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Content` if a member named `name` was already
    /// emitted.
    pub fn emit_member(&mut self, name: &str, item: TokenStream) -> Result<(), GeneratorError> {
        if !self.member_names.insert(name.to_string()) {
            return Err(GeneratorError::Content(format!(
                "duplicate member '{}'",
                name
            )));
        }
        self.members.push(item);
        Ok(())
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Assembles every emitted part into one token stream.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Content` if no type was declared.
    pub fn to_tokens(&self) -> Result<TokenStream, GeneratorError> {
        let TypeDeclaration { name, base } = self.declaration.as_ref().ok_or_else(|| {
            GeneratorError::Content("artifact has no type declaration".to_string())
        })?;

        let package_doc = self
            .package_doc
            .as_ref()
            .map(|doc| quote! { #![doc = #doc] });
        let imports = &self.imports;
        let constructor = &self.constructor;
        let bindings = &self.bindings;
        let members = &self.members;

        let base_binding = if constructor.is_empty() {
            quote! { let base = ApiMethods::default(); }
        } else {
            quote! { let mut base = ApiMethods::default(); }
        };

        Ok(quote! {
            #package_doc

            #(use #imports;)*

            pub struct #name {
                base: ApiMethods,
            }

            impl #name {
                pub fn new() -> Self {
                    #base_binding
                    #(#constructor)*
                    Self { base }
                }
            }

            impl #base for #name {
                fn base(&self) -> &ApiMethods {
                    &self.base
                }

                fn prepare_variables(&self, variables: &mut Variables) {
                    #(#bindings)*
                }
            }

            impl #name {
                #(#members)*
            }
        })
    }
}
