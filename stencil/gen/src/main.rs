//! Stencil Code Generator
//!
//! Generates one source artifact per service from a project definition.

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use stencil_define::Project;
use stencil_gen::config::GeneratorOptions;
use stencil_gen::errors::GeneratorError;
use stencil_gen::orchestrator::{Generator, render_project};
use stencil_gen::strategy::GeneratorKind;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Stencil code generator - turns project definitions into per-service artifacts
#[derive(Parser, Debug)]
#[command(name = "stencil-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project definition (JSON)
    #[arg(short, long)]
    project: PathBuf,

    /// Generator options file (TOML); flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for generated sources
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output directory for the companion resource (defaults to --output)
    #[arg(long)]
    resources: Option<PathBuf>,

    /// Dotted package name (e.g., "acme.api.tests")
    #[arg(long)]
    package: Option<String>,

    /// Naming prefix of the companion resource file
    #[arg(long)]
    prefix: Option<String>,

    /// Artifact family to generate
    #[arg(long, value_enum)]
    kind: Option<GeneratorKind>,

    /// Do not write the companion resource file
    #[arg(long)]
    no_spec: bool,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,stencil_gen=info".to_string(),
            2 => "info,stencil_gen=debug".to_string(),
            _ => "debug,stencil_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Loads the options file (if any) and applies command-line overrides.
fn resolve_options(cli: &Cli) -> Result<GeneratorOptions, GeneratorError> {
    let mut options = match (&cli.config, &cli.output) {
        (Some(config), _) => GeneratorOptions::from_toml_file(config)?,
        (None, Some(output)) => GeneratorOptions::new(output),
        (None, None) => {
            return Err(GeneratorError::Configuration {
                label: "Sources output".to_string(),
                reason: "is not defined (pass --output or --config)".to_string(),
            });
        }
    };

    if let Some(output) = &cli.output {
        options.source_output_dir = output.clone();
    }
    if let Some(resources) = &cli.resources {
        options.resource_output_dir = Some(resources.clone());
    }
    if let Some(package) = &cli.package {
        options.package_name = Some(package.clone());
    }
    if let Some(prefix) = &cli.prefix {
        options.naming_prefix = prefix.clone();
    }
    if let Some(kind) = cli.kind {
        options.kind = kind;
    }
    if cli.no_spec {
        options.write_spec = false;
    }

    Ok(options)
}

/// Reads a project definition and records the directory it came from.
fn load_project(path: &Path) -> Result<Project, GeneratorError> {
    let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::Configuration {
        label: "Project definition".to_string(),
        reason: format!("cannot be read from {}: {}", path.display(), e),
    })?;
    let mut project: Project =
        serde_json::from_str(&content).map_err(|e| GeneratorError::Configuration {
            label: "Project definition".to_string(),
            reason: format!("is not valid: {}", e),
        })?;

    if let Some(dir) = path.parent() {
        project
            .variables
            .entry(GeneratorOptions::RESERVED_VARIABLE)
            .or_insert_with(|| Value::String(dir.display().to_string()));
    }

    Ok(project)
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let options = resolve_options(&cli)?;
    let project = load_project(&cli.project)?;
    info!(
        project = %cli.project.display(),
        services = project.services.len(),
        dry_run = cli.dry_run,
        "loaded project"
    );

    if cli.dry_run {
        let rendered = render_project(
            &project,
            options.package_name(),
            options.kind.naming(),
            &options.kind,
        )?;
        for artifact in rendered {
            println!("{}", format!("// ==> {}", artifact.name.file_name).cyan());
            match artifact.content {
                Some(code) => println!("{}", code),
                None => println!("{}", "// (no content, would be discarded)".yellow()),
            }
        }
        return Ok(());
    }

    let report = Generator::new(options)?.generate(&project)?;

    for path in &report.committed {
        println!("{} {}", "generated".green().bold(), path.display());
    }
    for class_name in &report.discarded {
        println!("{} {} (no content)", "skipped".yellow().bold(), class_name);
    }
    if let Some(spec_file) = &report.spec_file {
        println!("{} {}", "wrote".green().bold(), spec_file.display());
    }

    Ok(())
}
