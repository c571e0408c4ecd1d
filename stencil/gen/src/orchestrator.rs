//! Generation runs.
//!
//! A [`Generator`] turns every service of a [`Project`] into one artifact:
//!
//! 1. All services are validated (usable, unique names) before any file is
//!    touched
//! 2. Each service is driven through the [`ArtifactEmitter`] lifecycle in
//!    declared order
//! 3. The project model is written next to the artifacts as a companion
//!    resource file (unless disabled)
//!
//! The first error aborts the run. Artifacts committed before the error stay
//! on disk; the failing service leaves nothing behind.
//!
//! ## Example
//!
//! ```no_run
//! use stencil_define::{HttpMethod, Method, Project, Service};
//! use stencil_gen::config::GeneratorOptions;
//! use stencil_gen::orchestrator::Generator;
//!
//! let project = Project::new()
//!     .with_service(Service::new("Users").with_method(Method::new("List", HttpMethod::Get, "/users")))
//!     .with_variable("token", "abc");
//!
//! let generator = Generator::new(GeneratorOptions::new("generated/src")).unwrap();
//! let report = generator.generate(&project).unwrap();
//! assert_eq!(report.committed.len(), 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use stencil_define::{Project, Service};
use tracing::{debug, info};

use crate::config::GeneratorOptions;
use crate::emitter::{Artifact, ArtifactEmitter, ArtifactOutcome, render, write_prologue};
use crate::errors::GeneratorError;
use crate::layout::OutputRoots;
use crate::naming::{ArtifactName, NamingStrategy};
use crate::output::write_atomic;
use crate::source::SourceWriter;
use crate::strategy::ContentStrategy;

/// What a generation run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Paths of committed artifacts, in service order.
    pub committed: Vec<PathBuf>,
    /// Class names of artifacts discarded for lack of content.
    pub discarded: Vec<String>,
    /// Path of the companion resource file, if one was written.
    pub spec_file: Option<PathBuf>,
}

/// An artifact rendered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub name: ArtifactName,
    /// Formatted code, or `None` if the strategy produced no content.
    pub content: Option<String>,
}

/// Checks every service before anything is written.
///
/// Returns the artifact names in service order.
///
/// ## Errors
///
/// Returns `GeneratorError::Validation` if a service name is blank or
/// unusable, or if two services map to the same artifact file.
pub fn validate_project(
    project: &Project,
    naming: NamingStrategy,
) -> Result<Vec<ArtifactName>, GeneratorError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut names = Vec::with_capacity(project.services.len());

    for (index, service) in project.services.iter().enumerate() {
        if !service.has_name() {
            return Err(GeneratorError::Validation(format!(
                "service #{} has no name",
                index + 1
            )));
        }
        let name = naming.artifact_name(&service.name)?;
        if let Some(previous) = seen.insert(name.file_name.clone(), &service.name) {
            return Err(GeneratorError::Validation(format!(
                "services '{}' and '{}' both generate '{}'",
                previous, service.name, name.file_name
            )));
        }
        names.push(name);
    }

    Ok(names)
}

/// Renders every artifact of `project` without touching the filesystem.
///
/// ## Errors
///
/// Returns the same validation and content errors a real run would.
pub fn render_project<S>(
    project: &Project,
    package: &str,
    naming: NamingStrategy,
    strategy: &S,
) -> Result<Vec<RenderedArtifact>, GeneratorError>
where
    S: ContentStrategy + ?Sized,
{
    let names = validate_project(project, naming)?;

    project
        .services
        .iter()
        .zip(names)
        .map(|(service, name)| -> Result<RenderedArtifact, GeneratorError> {
            let mut writer = SourceWriter::new();
            write_prologue(&mut writer, package, &name, service, project, strategy)?;
            let content = if strategy.write_body(service, &mut writer)? {
                Some(render(&writer)?)
            } else {
                None
            };
            Ok(RenderedArtifact { name, content })
        })
        .collect()
}

/// Runs the generator for one set of options.
pub struct Generator {
    options: GeneratorOptions,
    roots: OutputRoots,
    strategy: Box<dyn ContentStrategy>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("options", &self.options)
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Validates the output roots and uses the content strategy of
    /// `options.kind`.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Configuration` if an option is invalid or an
    /// output root is unusable.
    pub fn new(options: GeneratorOptions) -> Result<Self, GeneratorError> {
        options.validate()?;
        let roots = OutputRoots::new(
            &options.source_output_dir,
            options.resource_output_dir.as_deref(),
        )?;
        let strategy = Box::new(options.kind);
        Ok(Self {
            options,
            roots,
            strategy,
        })
    }

    /// Replaces the content strategy. Naming still follows `options.kind`.
    pub fn with_strategy(mut self, strategy: impl ContentStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates one artifact per service.
    ///
    /// ## Errors
    ///
    /// Returns the first error encountered. Validation errors are reported
    /// before any artifact is created.
    pub fn generate(&self, project: &Project) -> Result<GenerationReport, GeneratorError> {
        let naming = self.options.kind.naming();
        validate_project(project, naming)?;

        let package = self.options.package_name();
        info!(
            services = project.services.len(),
            package,
            kind = ?self.options.kind,
            "generating artifacts"
        );

        let emitter = ArtifactEmitter::new(&self.roots, package);
        let mut report = GenerationReport::default();
        for service in &project.services {
            match self.generate_service(&emitter, naming, project, service)? {
                ArtifactOutcome::Committed { path, .. } => report.committed.push(path),
                ArtifactOutcome::Discarded { class_name } => report.discarded.push(class_name),
            }
        }

        if self.options.write_spec {
            report.spec_file = Some(self.write_spec(project)?);
        }

        info!(
            committed = report.committed.len(),
            discarded = report.discarded.len(),
            "generation finished"
        );
        Ok(report)
    }

    fn generate_service(
        &self,
        emitter: &ArtifactEmitter<'_>,
        naming: NamingStrategy,
        project: &Project,
        service: &Service,
    ) -> Result<ArtifactOutcome, GeneratorError> {
        let mut artifact = emitter.open(service, naming)?;
        if let Err(e) = self.drive(&mut artifact, project, service) {
            if let Err(cleanup) = artifact.discard() {
                debug!(error = %cleanup, "cleanup after failed artifact also failed");
            }
            return Err(e);
        }
        artifact.commit()
    }

    fn drive(
        &self,
        artifact: &mut Artifact,
        project: &Project,
        service: &Service,
    ) -> Result<(), GeneratorError> {
        artifact.emit_prologue(service, project, &*self.strategy)?;
        artifact.delegate_body(service, &*self.strategy)
    }

    /// Writes the project model as pretty JSON to the resource package dir.
    fn write_spec(&self, project: &Project) -> Result<PathBuf, GeneratorError> {
        let dir = self
            .roots
            .resources_package_dir(self.options.package_name())?;
        let path = dir.join(self.options.spec_file_name());
        let json = serde_json::to_string_pretty(project).map_err(|e| {
            GeneratorError::Content(format!("project cannot be serialized: {}", e))
        })?;
        write_atomic(&path, &json)?;
        info!(path = %path.display(), "wrote companion resource");
        Ok(path)
    }
}
