//! # `forgeyml`
//!
//! `forgeyml` validates a feedstock's `conda-forge.yml`, reports every problem
//! against the dotted path of the offending field, and prints the fully
//! normalized configuration on request.
//!
//! ## Usage
//!
//! ```sh
//! forgeyml --config conda-forge.yml
//! forgeyml --recipe-dir recipe --lint
//! forgeyml --normalized --output-format json
//! ```
//!
//! Exit codes: 0 valid, 1 configuration file missing or unparsable,
//! 2 validation failed, 3 filesystem error.

use anyhow::Result;
use clap::Parser as _;
use forgeyml::cli::Args;
use forgeyml::error::ForgeError;
use forgeyml::operations::render::OutputFormat;
use forgeyml::system::RealSystem;
use forgeyml::{ConfigSource, run_docs, run_lint, run_normalized, run_schema, run_validate};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

fn exit_with(result: Result<String>) -> ! {
    match result {
        Ok(output) => {
            println!("{output}");
            std::process::exit(0)
        }
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(err.downcast_ref::<ForgeError>().map_or(1, ForgeError::exit_code))
        }
    }
}

fn main() {
    let args = Args::parse();

    // Keep stdout clean for output consumed by other tools
    let log_level = if args.verbose {
        "debug"
    } else if args.is_machine_output() {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if args.docs {
        exit_with(Ok(run_docs()));
    }
    if args.schema {
        exit_with(run_schema());
    }

    let system = RealSystem::new();
    let source = args
        .recipe_dir
        .clone()
        .map_or_else(|| ConfigSource::File(args.config.clone()), ConfigSource::RecipeDir);

    if args.normalized {
        let format = args.output_format.parse::<OutputFormat>().unwrap_or_else(|err| {
            error!("{}", err);
            std::process::exit(1);
        });
        exit_with(run_normalized(&system, &source, format));
    }

    if args.lint {
        match run_lint(&system, &source) {
            Ok(report) => {
                if report.is_clean() {
                    info!("No lints or hints for {}", source.name());
                }
                print!("{}", report.to_markdown(source.name()));
                std::process::exit(if report.lints.is_empty() { 0 } else { 2 });
            }
            Err(err) => exit_with(Err(err)),
        }
    }

    exit_with(run_validate(&system, &source));
}
