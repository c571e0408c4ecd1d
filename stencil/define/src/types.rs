//! Core types for project definitions.
//!
//! - [`Project`] - The top-level definition: services plus named variables
//! - [`Service`] - One named unit that becomes one generated artifact
//! - [`Method`] - A single operation exposed by a service
//! - [`HttpMethod`] - HTTP method enumeration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use crate::type_tag::TypeTag;

/// HTTP methods a service method can use.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use stencil_define::HttpMethod;
///
/// assert_eq!(HttpMethod::from_str("GET").unwrap(), HttpMethod::Get);
/// assert_eq!(HttpMethod::Post.to_string(), "POST");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

/// A complete project definition.
///
/// Services are kept in declaration order, and so are variables: the
/// variable map preserves insertion order rather than sorting its keys.
///
/// ## Examples
///
/// ```
/// use stencil_define::{HttpMethod, Method, Project, Service};
///
/// let project = Project::new()
///     .with_service(Service::new("Users").with_method(Method::new("List", HttpMethod::Get, "/users")))
///     .with_variable("token", "abc");
///
/// assert_eq!(project.services.len(), 1);
/// assert_eq!(project.variables["token"], "abc");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Informational project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Services, in the order they were declared.
    #[serde(default)]
    pub services: Vec<Service>,
    /// Named configuration variables injected into every artifact.
    #[serde(default)]
    pub variables: Map<String, Value>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// Adds a variable, replacing an earlier one with the same key in place.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}

/// A named service.
///
/// The name is required before generation, but an absent name deserializes
/// as an empty string so the generator can report it instead of the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// True when the name contains something other than whitespace.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// A single service method.
///
/// ## Examples
///
/// ```
/// use stencil_define::{HttpMethod, Method, TypeTag};
///
/// let method = Method::new("GetUser", HttpMethod::Get, "/users/{id}")
///     .with_response(TypeTag::Object);
///
/// assert_eq!(method.response, Some(TypeTag::Object));
/// assert!(method.request.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(rename = "method", default)]
    pub http_method: HttpMethod,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<TypeTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<TypeTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Method {
    pub fn new(name: impl Into<String>, http_method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            http_method,
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_request(mut self, tag: TypeTag) -> Self {
        self.request = Some(tag);
        self
    }

    pub fn with_response(mut self, tag: TypeTag) -> Self {
        self.response = Some(tag);
        self
    }
}
