//! Thin demo CLI over `elearning-core`: detect a package's standard, parse
//! its manifest, run its rule set, and print the result.
//!
//! Not the crate's contract -- `elearning-core` is the library other tools
//! embed. This binary exists so the library is runnable on its own, the way
//! the teacher's CLI sits on top of its validation engine.

use clap::{Parser as ClapParser, ValueEnum};
use colored::Colorize;
use elearning_core::{CoreError, ParserFactory, ParserOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(name = "elearning-lint", version, about = "Validate a SCORM/AICC/cmi5/xAPI package")]
struct Cli {
    /// Path to the package root: a directory, or a `.zip` archive.
    path: PathBuf,

    /// Exit non-zero and report a `Manifest/Parse` failure if any rule reports an error.
    #[arg(long)]
    strict: bool,

    /// Run the opt-in XSD schema validator against SCORM 2004 manifests
    /// (requires the `schema-validation` feature).
    #[arg(long)]
    validate_schema: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,
}

#[derive(Copy, Clone, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> ExitCode {
    let options = ParserOptions::builder()
        .strict_mode(cli.strict)
        .validate_xml_against_schema(cli.validate_schema)
        .build();

    let factory = ParserFactory::new();
    match factory.open_and_parse(cli.path.clone(), options) {
        Ok(result) => {
            report(&cli, &result);
            if result.validation.is_valid() {
                ExitCode::from(0)
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            report_error(&cli, &err);
            ExitCode::from(2)
        }
    }
}

fn report(cli: &Cli, result: &elearning_core::ParseResult) {
    match cli.format {
        OutputFormat::Human => {
            let module_type = result
                .metadata
                .manifest
                .module_type
                .map(|m| m.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("{} {module_type}", "standard:".bold());
            if result.validation.is_valid() {
                println!("{}", "valid, no errors".green());
            } else {
                println!("{}", result.validation.format_errors().red());
            }
            for warning in result.validation.warnings() {
                println!("{} {} ({})", "warning:".yellow(), warning.message, warning.location);
            }
        }
        OutputFormat::Json => {
            let payload = json_report(result);
            println!("{}", serde_json::to_string_pretty(&payload).expect("report serializes"));
        }
    }
}

fn json_report(result: &elearning_core::ParseResult) -> serde_json::Value {
    let issues: Vec<serde_json::Value> = result
        .validation
        .issues()
        .iter()
        .map(|issue| {
            serde_json::json!({
                "severity": format!("{:?}", issue.severity),
                "code": issue.code,
                "message": issue.message,
                "location": issue.location.to_string(),
                "suggestedFix": issue.suggested_fix,
            })
        })
        .collect();

    serde_json::json!({
        "valid": result.validation.is_valid(),
        "moduleType": result.metadata.manifest.module_type.map(|m| m.to_string()),
        "identifier": result.metadata.manifest.identifier,
        "title": result.metadata.manifest.title,
        "launchUrl": result.metadata.manifest.launch_url,
        "issues": issues,
    })
}

fn report_error(cli: &Cli, err: &CoreError) {
    match cli.format {
        OutputFormat::Human => eprintln!("{} {err}", "error:".red().bold()),
        OutputFormat::Json => {
            let payload = serde_json::json!({ "valid": false, "error": err.to_string() });
            println!("{}", serde_json::to_string_pretty(&payload).expect("report serializes"));
        }
    }
}
