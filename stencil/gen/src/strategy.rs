//! Content strategies.
//!
//! A content strategy writes the service-specific body of an artifact. The
//! emitter owns everything else (file lifecycle, prologue, commit), so a
//! strategy only decides *what* members to emit and reports whether it
//! emitted any. An artifact whose strategy reports `false` is discarded.
//!
//! Two strategies ship with the generator, selected by [`GeneratorKind`]:
//!
//! - [`GeneratorKind::Tests`] emits one `check_*` method per service method
//! - [`GeneratorKind::Schema`] emits one `RESPONSE_*` constant per JSON response type
//!
//! Any closure with the right signature is a strategy too, which is how
//! callers plug in their own bodies:
//!
//! ```
//! use stencil_define::Service;
//! use stencil_gen::errors::GeneratorError;
//! use stencil_gen::source::SourceWriter;
//! use stencil_gen::strategy::ContentStrategy;
//!
//! let nothing = |_: &Service, _: &mut SourceWriter| -> Result<bool, GeneratorError> { Ok(false) };
//! let mut writer = SourceWriter::new();
//! assert!(!nothing.write_body(&Service::new("Users"), &mut writer).unwrap());
//! ```

use clap::ValueEnum;
use proc_macro2::Ident;
use quote::{format_ident, quote};
use serde::{Deserialize, Serialize};
use stencil_define::{HttpMethod, Service};

use crate::errors::GeneratorError;
use crate::naming::{NamingStrategy, to_snake_case};
use crate::source::{SourceWriter, identifier, string_literal};

/// Writes the service-specific part of an artifact.
pub trait ContentStrategy {
    /// Hook for extra constructor statements. `base` is in scope.
    fn write_constructor(
        &self,
        _service: &Service,
        _writer: &mut SourceWriter,
    ) -> Result<(), GeneratorError> {
        Ok(())
    }

    /// Emits body members and returns whether at least one was produced.
    fn write_body(&self, service: &Service, writer: &mut SourceWriter)
    -> Result<bool, GeneratorError>;
}

impl<F> ContentStrategy for F
where
    F: Fn(&Service, &mut SourceWriter) -> Result<bool, GeneratorError>,
{
    fn write_body(
        &self,
        service: &Service,
        writer: &mut SourceWriter,
    ) -> Result<bool, GeneratorError> {
        self(service, writer)
    }
}

/// The artifact families the generator knows how to produce.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    /// Request checks: one method per service method.
    #[default]
    Tests,
    /// Response type names: one constant per JSON response.
    Schema,
}

impl GeneratorKind {
    /// Naming used for this kind's artifacts.
    pub fn naming(self) -> NamingStrategy {
        match self {
            GeneratorKind::Tests => NamingStrategy::with_suffix("Tests"),
            GeneratorKind::Schema => NamingStrategy::with_suffix("Schema"),
        }
    }
}

impl ContentStrategy for GeneratorKind {
    fn write_constructor(
        &self,
        service: &Service,
        writer: &mut SourceWriter,
    ) -> Result<(), GeneratorError> {
        if *self == GeneratorKind::Tests {
            let name = string_literal(service.name.trim());
            writer.emit_constructor_statement(quote! { base.set_service(#name); });
        }
        Ok(())
    }

    fn write_body(
        &self,
        service: &Service,
        writer: &mut SourceWriter,
    ) -> Result<bool, GeneratorError> {
        match self {
            GeneratorKind::Tests => write_checks(service, writer),
            GeneratorKind::Schema => write_response_types(service, writer),
        }
    }
}

/// Variant identifier of `HttpMethod` as written in generated code.
fn http_method_variant(method: HttpMethod) -> Ident {
    let variant = match method {
        HttpMethod::Get => "Get",
        HttpMethod::Post => "Post",
        HttpMethod::Put => "Put",
        HttpMethod::Patch => "Patch",
        HttpMethod::Delete => "Delete",
        HttpMethod::Head => "Head",
        HttpMethod::Options => "Options",
    };
    format_ident!("{}", variant)
}

fn member_stem(service: &Service, method_name: &str) -> Result<String, GeneratorError> {
    let stem = to_snake_case(method_name);
    if stem.is_empty() {
        return Err(GeneratorError::Content(format!(
            "method '{}' of service '{}' has no usable name",
            method_name, service.name
        )));
    }
    Ok(stem)
}

fn write_checks(service: &Service, writer: &mut SourceWriter) -> Result<bool, GeneratorError> {
    let mut written = false;
    for method in &service.methods {
        if method.path.trim().is_empty() {
            continue;
        }
        let fn_name = format!("check_{}", member_stem(service, &method.name)?);
        let ident = identifier(&fn_name)?;
        let variant = http_method_variant(method.http_method);
        let path = string_literal(&method.path);
        let doc = format!(" Checks `{} {}`.", method.http_method, method.path);

        writer.emit_member(
            &fn_name,
            quote! {
                #[doc = #doc]
                pub fn #ident(&self) -> CheckResult {
                    self.base.check(HttpMethod::#variant, #path)
                }
            },
        )?;
        written = true;
    }
    Ok(written)
}

fn write_response_types(
    service: &Service,
    writer: &mut SourceWriter,
) -> Result<bool, GeneratorError> {
    let mut written = false;
    for method in &service.methods {
        let Some(tag) = method.response else {
            continue;
        };
        // File responses are binary payloads without a JSON schema
        if !tag.is_json() {
            continue;
        }
        let stem = member_stem(service, &method.name)?;
        let const_name = format!("RESPONSE_{}", stem.to_uppercase());
        let ident = identifier(&const_name)?;
        let type_name = tag.canonical_name();
        let doc = format!(" Response type of `{}`.", method.name);

        writer.emit_member(
            &const_name,
            quote! {
                #[doc = #doc]
                pub const #ident: &'static str = #type_name;
            },
        )?;
        written = true;
    }
    Ok(written)
}
