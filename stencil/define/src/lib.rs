//! Stencil Definition Library
//!
//! Types for describing an API surface declaratively. These definitions are
//! consumed by `stencil-gen`, which emits one source artifact per service.
//!
//! ## Core Types
//!
//! - [`Project`] - Ordered services plus a map of named variables
//! - [`Service`] - A named unit of the model; one artifact is generated per service
//! - [`Method`] - A single operation with an HTTP method, a path and type tags
//! - [`HttpMethod`] - HTTP methods (GET, POST, PUT, etc.)
//! - [`TypeTag`] - The closed set of schema types, with canonical lowercase names
//!
//! ## Examples
//!
//! ```
//! use stencil_define::{HttpMethod, Method, Project, Service, TypeTag};
//!
//! let project = Project::new()
//!     .with_service(
//!         Service::new("Users")
//!             .with_method(Method::new("ListUsers", HttpMethod::Get, "/users").with_response(TypeTag::Array)),
//!     )
//!     .with_variable("token", "abc");
//!
//! assert_eq!(project.services[0].methods[0].response.unwrap().canonical_name(), "array");
//! ```

pub mod type_tag;
pub mod types;

pub use type_tag::{TypeTag, UnknownTypeTag, fold_ascii_lowercase};
pub use types::{HttpMethod, Method, Project, Service};
