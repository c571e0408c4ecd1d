//! Stencil code generator library.
//!
//! This crate generates one Rust source artifact per service of a project
//! definition created with `stencil-define`. Every artifact has the same
//! fixed structure, with a service-specific body supplied by a pluggable
//! content strategy:
//!
//! - A generated-file notice and a package doc line
//! - A fixed `use` list
//! - A struct wrapping the shared `ApiMethods` base, with a `new()` constructor
//! - A `RestApiMethods` impl whose `prepare_variables()` binds the project variables
//! - An impl block holding the strategy's members
//!
//! ## Modules
//!
//! - [`orchestrator`] - Generation runs over a whole project
//! - [`emitter`] - Lifecycle of a single artifact (open, prologue, body, commit)
//! - [`strategy`] - Content strategies and the built-in generator kinds
//! - [`source`] - Token-level assembly of one artifact
//! - [`bindings`] - Variable binding statements
//! - [`naming`] - Class, file and member names
//! - [`layout`] - Output roots and package directories
//! - [`output`] - Validation, formatting and atomic file writes
//! - [`config`] - Generator options
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use stencil_define::{HttpMethod, Method, Project, Service};
//! use stencil_gen::config::GeneratorOptions;
//! use stencil_gen::orchestrator::Generator;
//!
//! let project = Project::new()
//!     .with_service(Service::new("Alpha").with_method(Method::new("Ping", HttpMethod::Get, "/ping")))
//!     .with_variable("token", "abc");
//!
//! let generator = Generator::new(GeneratorOptions::new("generated/src")).unwrap();
//! let report = generator.generate(&project).unwrap();
//! println!("{:?}", report.committed);
//! ```
//!
//! ## Generated Code Structure
//!
//! For a service named "Alpha" with a `Ping` method, the tests kind writes
//! `spec/tests/rest/alpha_tests.rs`:
//!
//! ```text
//! //! Generated `AlphaTests` artifact for package `spec.tests.rest`.
//! use stencil_runtime::ApiMethods;
//! ...
//!
//! pub struct AlphaTests {
//!     base: ApiMethods,
//! }
//!
//! impl RestApiMethods for AlphaTests {
//!     fn prepare_variables(&self, variables: &mut Variables) {
//!         variables.set("token", "abc");
//!     }
//! }
//!
//! impl AlphaTests {
//!     pub fn check_ping(&self) -> CheckResult { ... }
//! }
//! ```

pub mod bindings;
pub mod config;
pub mod emitter;
pub mod errors;
pub mod layout;
pub mod naming;
pub mod orchestrator;
pub mod output;
pub mod source;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_utils;
