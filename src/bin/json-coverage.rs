//! JSON Field Coverage CLI
//!
//! Command-line interface for checking payloads against JSON Schema documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use json_coverage::{
    declared_paths, load_json, load_json_auto, root_from_json_schema, MatchError, MatchOptions,
    Matcher, RootShape,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "json-coverage")]
#[command(about = "Check that a JSON document contains every field a schema declares")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every schema field missing from a payload
    Check {
        /// Payload file to check
        payload: PathBuf,

        /// Schema source: file path or URL (http:// or https://)
        #[arg(long)]
        schema: String,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Allow fields marked "x-coverage": "optional" to be absent
        #[arg(long)]
        allow_omitempty: bool,

        /// Suppress output, only set the exit code
        #[arg(long, short, conflicts_with = "json")]
        quiet: bool,
    },

    /// List every field path a schema requires
    Fields {
        /// Schema source: file path or URL (http:// or https://)
        #[arg(long)]
        schema: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            payload,
            schema,
            json,
            allow_omitempty,
            quiet,
        } => run_check(CheckArgs {
            payload,
            schema,
            json_output: json,
            allow_omitempty,
            quiet,
        }),
        Commands::Fields { schema } => run_fields(&schema),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_root(schema_source: &str) -> Result<RootShape, MatchError> {
    let schema = load_json_auto(schema_source)?;
    root_from_json_schema(&schema)
}

struct CheckArgs {
    payload: PathBuf,
    schema: String,
    json_output: bool,
    allow_omitempty: bool,
    quiet: bool,
}

fn run_check(args: CheckArgs) -> Result<(), u8> {
    let CheckArgs {
        payload: payload_path,
        schema: schema_source,
        json_output,
        allow_omitempty,
        quiet,
    } = args;

    let root = load_root(&schema_source).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    let payload = load_json(&payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let options = MatchOptions::new().allow_missing_omitempty(allow_omitempty);
    let report = Matcher::new(options).check(&root, &payload).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    if json_output {
        let output = serde_json::json!({
            "matched": report.matched,
            "missing": report.missing,
        });
        println!("{}", output);
    } else if !quiet {
        if report.matched {
            println!("Complete");
        } else {
            eprintln!("Incomplete: {} missing field(s):", report.missing.len());
            for path in &report.missing {
                eprintln!("  {}", path);
            }
        }
    }

    if report.matched {
        Ok(())
    } else {
        Err(1)
    }
}

fn run_fields(schema_source: &str) -> Result<(), u8> {
    let root = load_root(schema_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    for path in declared_paths(&root) {
        println!("{}", path);
    }
    Ok(())
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "matched": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
