//! Variable binding injection.
//!
//! Every project variable except the reserved key becomes one statement in
//! the artifact's `prepare_variables` body:
//!
//! ```ignore
//! variables.set("token", "abc");
//! ```
//!
//! Values are stringified before injection, so the generated code only ever
//! sees string literals.

use proc_macro2::TokenStream;
use quote::quote;
use serde_json::{Map, Value};

use crate::source::{SourceWriter, string_literal};

/// Converts any variable value to the text that is injected.
///
/// Strings are used as-is, `null` becomes `"null"`, and every other value
/// uses its JSON form.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use stencil_gen::bindings::stringify_value;
///
/// assert_eq!(stringify_value(&json!("abc")), "abc");
/// assert_eq!(stringify_value(&json!(null)), "null");
/// assert_eq!(stringify_value(&json!([1, 2])), "[1,2]");
/// ```
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds one binding statement per non-reserved variable, in map order.
pub fn binding_statements(variables: &Map<String, Value>, reserved: &str) -> Vec<TokenStream> {
    variables
        .iter()
        .filter(|(key, _)| key.as_str() != reserved)
        .map(|(key, value)| {
            let key = string_literal(key);
            let value = string_literal(&stringify_value(value));
            quote! { variables.set(#key, #value); }
        })
        .collect()
}

/// Writes the binding statements into `writer`, returning how many were written.
pub fn inject_bindings(
    writer: &mut SourceWriter,
    variables: &Map<String, Value>,
    reserved: &str,
) -> usize {
    let statements = binding_statements(variables, reserved);
    let count = statements.len();
    for statement in statements {
        writer.emit_binding_statement(statement);
    }
    count
}
