//! Lifecycle of a single generated artifact.
//!
//! An [`Artifact`] moves through a fixed sequence of states:
//!
//! ```text
//! open() -> Opened -> emit_prologue() -> HeaderWritten -> delegate_body() -> BodyDelegated
//!        -> commit() -> Committed | Discarded
//! ```
//!
//! `open` binds a file handle to a sibling temp file (`<name>.tmp`). The
//! artifact path itself is only ever produced by renaming the completed temp
//! file at commit time, so neither an empty nor a half-written artifact can
//! appear at that path, even if the process dies mid-run. When the content
//! strategy reports that it produced nothing, commit removes the temp file
//! and any artifact left at the path by an earlier run.
//!
//! Persistence is decided by [`Artifact::commit`] and [`Artifact::discard`]
//! only. Dropping an artifact that was never finished just removes its temp
//! file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use stencil_define::{Project, Service};
use tracing::{debug, info, warn};

use crate::bindings::inject_bindings;
use crate::config::GeneratorOptions;
use crate::errors::GeneratorError;
use crate::layout::OutputRoots;
use crate::naming::{ArtifactName, NamingStrategy};
use crate::output::{format_code, temp_path, validate_code};
use crate::source::SourceWriter;
use crate::strategy::ContentStrategy;

/// Paths every artifact imports.
pub const ARTIFACT_IMPORTS: &[&str] = &[
    "stencil_runtime::ApiMethods",
    "stencil_runtime::CheckResult",
    "stencil_runtime::HttpMethod",
    "stencil_runtime::RestApiMethods",
    "stencil_runtime::Variables",
];

/// The capability every artifact type implements.
pub const BASE_CAPABILITY: &str = "RestApiMethods";

/// Where an artifact is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Opened,
    HeaderWritten,
    BodyDelegated,
    Committed,
    Discarded,
}

/// What became of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// The artifact was written to `path`.
    Committed { class_name: String, path: PathBuf },
    /// The strategy produced no content; nothing is left on disk.
    Discarded { class_name: String },
}

/// Writes the fixed prologue of an artifact into `writer`.
///
/// In order: package declaration, imports, the type declaration, the
/// strategy's constructor statements and the variable bindings. Returns the
/// number of bindings written.
///
/// ## Errors
///
/// Returns `GeneratorError::Content` if a name does not form valid code or
/// the strategy's constructor hook fails.
pub fn write_prologue<S>(
    writer: &mut SourceWriter,
    package: &str,
    name: &ArtifactName,
    service: &Service,
    project: &Project,
    strategy: &S,
) -> Result<usize, GeneratorError>
where
    S: ContentStrategy + ?Sized,
{
    writer.emit_package(package, &name.class_name);
    writer.emit_imports(ARTIFACT_IMPORTS)?;
    writer.begin_type(&name.class_name, BASE_CAPABILITY)?;
    strategy.write_constructor(service, writer)?;
    Ok(inject_bindings(
        writer,
        &project.variables,
        GeneratorOptions::RESERVED_VARIABLE,
    ))
}

/// Assembles, validates and formats the content of `writer`.
///
/// ## Errors
///
/// Returns `GeneratorError::Content` if the assembled code does not parse.
pub fn render(writer: &SourceWriter) -> Result<String, GeneratorError> {
    let tokens = writer.to_tokens()?;
    let file = validate_code(&tokens)?;
    Ok(format_code(&file))
}

/// Opens artifacts below a package directory of the source root.
#[derive(Debug)]
pub struct ArtifactEmitter<'a> {
    roots: &'a OutputRoots,
    package: &'a str,
}

impl<'a> ArtifactEmitter<'a> {
    pub fn new(roots: &'a OutputRoots, package: &'a str) -> Self {
        Self { roots, package }
    }

    /// Resolves the artifact path for `service` and opens a writer for it.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Validation` if the service name cannot be
    /// turned into an artifact name, `GeneratorError::Configuration` if the
    /// package directory cannot be created, and `GeneratorError::Io` if the
    /// file cannot be opened.
    pub fn open(
        &self,
        service: &Service,
        naming: NamingStrategy,
    ) -> Result<Artifact, GeneratorError> {
        let name = naming.artifact_name(&service.name)?;
        let dir = self.roots.sources_package_dir(self.package)?;
        let path = dir.join(&name.file_name);
        let temp = temp_path(&path);

        let file = File::create(&temp).map_err(|e| GeneratorError::io(&temp, e))?;
        debug!(class = %name.class_name, path = %path.display(), "opened artifact");

        Ok(Artifact {
            name,
            package: self.package.to_string(),
            path,
            temp,
            file: Some(BufWriter::new(file)),
            writer: SourceWriter::new(),
            state: ArtifactState::Opened,
            has_content: false,
        })
    }
}

/// One artifact being generated.
#[derive(Debug)]
pub struct Artifact {
    name: ArtifactName,
    package: String,
    path: PathBuf,
    temp: PathBuf,
    file: Option<BufWriter<File>>,
    writer: SourceWriter,
    state: ArtifactState,
    has_content: bool,
}

impl Artifact {
    pub fn state(&self) -> ArtifactState {
        self.state
    }

    pub fn class_name(&self) -> &str {
        &self.name.class_name
    }

    /// Final path of the artifact once committed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn expect_state(&self, expected: ArtifactState, operation: &str) -> Result<(), GeneratorError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GeneratorError::Content(format!(
                "cannot {} artifact '{}' in state {:?}",
                operation, self.name.class_name, self.state
            )))
        }
    }

    /// Writes the identity, imports, type declaration, constructor and
    /// variable bindings.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Content` if called out of order or if the
    /// prologue does not form valid code.
    pub fn emit_prologue<S>(
        &mut self,
        service: &Service,
        project: &Project,
        strategy: &S,
    ) -> Result<(), GeneratorError>
    where
        S: ContentStrategy + ?Sized,
    {
        self.expect_state(ArtifactState::Opened, "write the prologue of")?;
        let bindings = write_prologue(
            &mut self.writer,
            &self.package,
            &self.name,
            service,
            project,
            strategy,
        )?;
        self.state = ArtifactState::HeaderWritten;
        debug!(class = %self.name.class_name, bindings, "wrote prologue");
        Ok(())
    }

    /// Lets `strategy` write the body and records whether it produced content.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Content` if called out of order; strategy
    /// errors are passed through.
    pub fn delegate_body<S>(&mut self, service: &Service, strategy: &S) -> Result<(), GeneratorError>
    where
        S: ContentStrategy + ?Sized,
    {
        self.expect_state(ArtifactState::HeaderWritten, "delegate the body of")?;
        self.has_content = strategy.write_body(service, &mut self.writer)?;
        self.state = ArtifactState::BodyDelegated;
        debug!(
            class = %self.name.class_name,
            has_content = self.has_content,
            members = self.writer.member_count(),
            "delegated body"
        );
        Ok(())
    }

    /// Closes the artifact, keeping it only if the body produced content.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Content` if called before the body was
    /// delegated or if the assembled code does not parse, and
    /// `GeneratorError::Io` if writing, closing or renaming fails. On every
    /// error the artifact is removed.
    pub fn commit(mut self) -> Result<ArtifactOutcome, GeneratorError> {
        self.expect_state(ArtifactState::BodyDelegated, "commit")?;

        if !self.has_content {
            self.abandon()?;
            warn!(class = %self.name.class_name, "no content produced, discarded artifact");
            return Ok(ArtifactOutcome::Discarded {
                class_name: self.name.class_name.clone(),
            });
        }

        if let Err(e) = self.persist() {
            let _ = self.abandon();
            return Err(e);
        }

        self.state = ArtifactState::Committed;
        info!(class = %self.name.class_name, path = %self.path.display(), "committed artifact");
        Ok(ArtifactOutcome::Committed {
            class_name: self.name.class_name.clone(),
            path: self.path.clone(),
        })
    }

    /// Abandons the artifact, leaving nothing on disk for it.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Io` if closing or removing fails.
    pub fn discard(mut self) -> Result<(), GeneratorError> {
        self.abandon()?;
        debug!(class = %self.name.class_name, "discarded artifact");
        Ok(())
    }

    fn persist(&mut self) -> Result<(), GeneratorError> {
        let content = render(&self.writer)?;

        let mut file = self.file.take().ok_or_else(|| {
            GeneratorError::Content(format!("artifact '{}' is already closed", self.name.class_name))
        })?;
        file.write_all(content.as_bytes())
            .map_err(|e| GeneratorError::io(&self.temp, e))?;
        let file = file
            .into_inner()
            .map_err(|e| GeneratorError::io(&self.temp, e.into_error()))?;
        file.sync_all()
            .map_err(|e| GeneratorError::io(&self.temp, e))?;
        drop(file);

        fs::rename(&self.temp, &self.path).map_err(|e| GeneratorError::io(&self.path, e))
    }

    /// Closes the writer and removes both the temp file and any stale artifact.
    ///
    /// Removal happens even when closing fails; the close error is reported
    /// afterwards.
    fn abandon(&mut self) -> Result<(), GeneratorError> {
        let result = close_and_remove(self.file.take(), &self.temp, &[&self.temp, &self.path]);
        self.state = ArtifactState::Discarded;
        result
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        if matches!(
            self.state,
            ArtifactState::Committed | ArtifactState::Discarded
        ) {
            return;
        }
        self.file.take();
        let _ = fs::remove_file(&self.temp);
    }
}

fn remove_if_present(path: &Path) -> Result<(), GeneratorError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GeneratorError::io(path, e)),
    }
}

/// Flushes and drops `writer`, then removes every path in `paths`.
///
/// Every path is removed even if flushing failed; the first error is
/// returned afterwards.
fn close_and_remove<W: Write>(
    writer: Option<W>,
    writer_path: &Path,
    paths: &[&Path],
) -> Result<(), GeneratorError> {
    let closed = match writer {
        Some(mut writer) => writer.flush().map_err(|e| GeneratorError::io(writer_path, e)),
        None => Ok(()),
    };
    paths
        .iter()
        .map(|path| remove_if_present(path))
        .fold(closed, |first, removed| first.and(removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::GeneratorKind;
    use quote::quote;
    use stencil_define::{HttpMethod, Method};
    use tempfile::TempDir;

    const PACKAGE: &str = "spec.tests.rest";

    fn roots(temp_dir: &TempDir) -> OutputRoots {
        OutputRoots::new(&temp_dir.path().join("src"), None).unwrap()
    }

    fn project() -> Project {
        Project::new()
            .with_variable("token", "abc")
            .with_variable("baseDir", "/x")
    }

    fn alpha() -> Service {
        Service::new("Alpha").with_method(Method::new("ListItems", HttpMethod::Get, "/items"))
    }

    fn emits_nothing(_: &Service, _: &mut SourceWriter) -> Result<bool, GeneratorError> {
        Ok(false)
    }

    fn fails(_: &Service, _: &mut SourceWriter) -> Result<bool, GeneratorError> {
        Err(GeneratorError::Content("boom".to_string()))
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn close_failure_still_removes_temp_and_stale_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("alpha_tests.rs");
        let temp = temp_path(&path);
        fs::write(&temp, "// partial").unwrap();
        fs::write(&path, "// stale").unwrap();

        let err = close_and_remove(Some(FailingWriter), &temp, &[&temp, &path]).unwrap_err();

        assert!(matches!(err, GeneratorError::Io { .. }));
        assert!(err.to_string().contains("disk full"));
        assert!(!temp.exists());
        assert!(!path.exists());
    }

    #[test]
    fn close_and_remove_tolerates_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("never_written.rs");

        close_and_remove(None::<FailingWriter>, &path, &[&path]).unwrap();
    }

    #[test]
    fn open_creates_temp_file_only() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);

        let artifact = emitter.open(&alpha(), GeneratorKind::Tests.naming()).unwrap();

        assert_eq!(artifact.state(), ArtifactState::Opened);
        assert_eq!(
            artifact.path(),
            temp_dir.path().join("src/spec/tests/rest/alpha_tests.rs")
        );
        assert!(!artifact.path().exists());
        assert!(temp_path(artifact.path()).exists());
    }

    #[test]
    fn full_lifecycle_commits_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);
        let service = alpha();
        let kind = GeneratorKind::Tests;

        let mut artifact = emitter.open(&service, kind.naming()).unwrap();
        artifact.emit_prologue(&service, &project(), &kind).unwrap();
        assert_eq!(artifact.state(), ArtifactState::HeaderWritten);
        artifact.delegate_body(&service, &kind).unwrap();
        assert_eq!(artifact.state(), ArtifactState::BodyDelegated);
        let path = artifact.path().to_path_buf();

        let outcome = artifact.commit().unwrap();

        assert_eq!(
            outcome,
            ArtifactOutcome::Committed {
                class_name: "AlphaTests".to_string(),
                path: path.clone(),
            }
        );
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("// This code was automatically generated"));
        assert!(content.contains("//! Generated `AlphaTests` artifact for package `spec.tests.rest`."));
        assert!(content.contains("pub struct AlphaTests {"));
        assert!(content.contains("impl RestApiMethods for AlphaTests {"));
        assert!(content.contains("base.set_service(\"Alpha\");"));
        assert!(content.contains("variables.set(\"token\", \"abc\");"));
        assert!(!content.contains("baseDir"));
        assert!(content.contains("pub fn check_list_items(&self) -> CheckResult {"));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn prologue_sections_come_in_fixed_order() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);
        let service = alpha();
        let kind = GeneratorKind::Tests;

        let mut artifact = emitter.open(&service, kind.naming()).unwrap();
        artifact.emit_prologue(&service, &project(), &kind).unwrap();
        artifact.delegate_body(&service, &kind).unwrap();
        let path = artifact.path().to_path_buf();
        artifact.commit().unwrap();

        let content = fs::read_to_string(path).unwrap();
        let positions: Vec<_> = [
            "//! Generated",
            "use stencil_runtime::ApiMethods;",
            "pub struct AlphaTests",
            "pub fn new() -> Self",
            "fn prepare_variables",
            "pub fn check_list_items",
        ]
        .iter()
        .map(|needle| content.find(needle).unwrap())
        .collect();

        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn no_content_discards_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);
        let service = alpha();

        let mut artifact = emitter.open(&service, GeneratorKind::Tests.naming()).unwrap();
        artifact.emit_prologue(&service, &project(), &emits_nothing).unwrap();
        artifact.delegate_body(&service, &emits_nothing).unwrap();
        let path = artifact.path().to_path_buf();

        let outcome = artifact.commit().unwrap();

        assert_eq!(
            outcome,
            ArtifactOutcome::Discarded {
                class_name: "AlphaTests".to_string()
            }
        );
        assert!(!path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn discard_removes_stale_artifact_from_earlier_run() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);
        let service = alpha();

        let mut artifact = emitter.open(&service, GeneratorKind::Tests.naming()).unwrap();
        fs::write(artifact.path(), "// stale").unwrap();
        artifact.emit_prologue(&service, &project(), &emits_nothing).unwrap();
        artifact.delegate_body(&service, &emits_nothing).unwrap();
        let path = artifact.path().to_path_buf();

        artifact.commit().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn strategy_failure_leaves_artifact_closed_and_removable() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);
        let service = alpha();

        let mut artifact = emitter.open(&service, GeneratorKind::Tests.naming()).unwrap();
        artifact.emit_prologue(&service, &project(), &fails).unwrap();
        let err = artifact.delegate_body(&service, &fails).unwrap_err();
        assert!(err.to_string().contains("boom"));
        let path = artifact.path().to_path_buf();

        artifact.discard().unwrap();

        assert!(!path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn dropping_unfinished_artifact_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);

        let artifact = emitter.open(&alpha(), GeneratorKind::Tests.naming()).unwrap();
        let path = artifact.path().to_path_buf();
        drop(artifact);

        assert!(!temp_path(&path).exists());
        assert!(!path.exists());
    }

    #[test]
    fn out_of_order_calls_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);
        let service = alpha();
        let kind = GeneratorKind::Tests;

        let mut artifact = emitter.open(&service, kind.naming()).unwrap();
        assert!(artifact.delegate_body(&service, &kind).is_err());

        artifact.emit_prologue(&service, &project(), &kind).unwrap();
        assert!(artifact.emit_prologue(&service, &project(), &kind).is_err());

        let path = artifact.path().to_path_buf();
        let err = artifact.commit().unwrap_err();
        assert!(matches!(err, GeneratorError::Content(_)));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn invalid_member_code_fails_commit_and_removes_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);
        let service = alpha();
        let broken = |_: &Service, writer: &mut SourceWriter| -> Result<bool, GeneratorError> {
            writer.emit_member("broken", quote! { let x = })?;
            Ok(true)
        };

        let mut artifact = emitter.open(&service, GeneratorKind::Tests.naming()).unwrap();
        artifact.emit_prologue(&service, &project(), &broken).unwrap();
        artifact.delegate_body(&service, &broken).unwrap();
        let path = artifact.path().to_path_buf();

        let err = artifact.commit().unwrap_err();

        assert!(matches!(err, GeneratorError::Content(_)));
        assert!(!path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn open_fails_with_io_error_when_path_is_blocked() {
        let temp_dir = TempDir::new().unwrap();
        let roots = roots(&temp_dir);
        let emitter = ArtifactEmitter::new(&roots, PACKAGE);
        let package_dir = roots.sources_package_dir(PACKAGE).unwrap();
        // A directory where the temp file should go
        fs::create_dir(package_dir.join("alpha_tests.tmp")).unwrap();

        let err = emitter
            .open(&alpha(), GeneratorKind::Tests.naming())
            .unwrap_err();

        assert!(matches!(err, GeneratorError::Io { .. }));
    }

    #[test]
    fn render_produces_schema_artifact() {
        let mut writer = SourceWriter::new();
        let name = GeneratorKind::Schema.naming().artifact_name("Alpha").unwrap();
        let service = Service::new("Alpha").with_method(
            Method::new("Get", HttpMethod::Get, "/a").with_response(stencil_define::TypeTag::Number),
        );
        let kind = GeneratorKind::Schema;

        let bindings = write_prologue(&mut writer, PACKAGE, &name, &service, &project(), &kind).unwrap();
        kind.write_body(&service, &mut writer).unwrap();
        let code = render(&writer).unwrap();

        assert_eq!(bindings, 1);
        assert!(code.contains("pub struct AlphaSchema"));
        assert!(code.contains("pub const RESPONSE_GET: &'static str = \"number\";"));
        assert!(code.contains("let base = ApiMethods::default();"));
    }
}
