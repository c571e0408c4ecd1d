//! Shared test utilities for stencil-gen tests.
//!
//! Fixture builders for projects, services and methods, so tests only spell
//! out the parts they care about.

use serde_json::{Map, Value};
use stencil_define::{HttpMethod, Method, Project, Service, TypeTag};

/// Creates a method with a JSON array response.
pub fn make_method(name: &str, http_method: HttpMethod, path: &str) -> Method {
    Method::new(name, http_method, path).with_response(TypeTag::Array)
}

/// Creates a service with a single `ListItems` method (`GET /items`).
///
/// The name is used verbatim, so blank names can be tested too.
pub fn make_service(name: &str) -> Service {
    Service::new(name).with_method(make_method("ListItems", HttpMethod::Get, "/items"))
}

/// Creates a project with the given services and the variables
/// `token = "abc"` and `baseDir = "/x"`.
pub fn make_project(services: Vec<Service>) -> Project {
    Project {
        name: Some("fixture".to_string()),
        services,
        variables: make_variables(&[("token", "abc"), ("baseDir", "/x")]),
    }
}

/// Builds an ordered variable map from string pairs.
pub fn make_variables(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_service_has_one_method() {
        let service = make_service("Alpha");
        assert_eq!(service.name, "Alpha");
        assert_eq!(service.methods.len(), 1);
        assert_eq!(service.methods[0].path, "/items");
    }

    #[test]
    fn make_project_keeps_variable_order() {
        let project = make_project(vec![]);
        let keys: Vec<_> = project.variables.keys().map(String::as_str).collect();
        assert_eq!(keys, ["token", "baseDir"]);
    }
}
