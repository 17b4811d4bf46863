//! CLI binary for htmlfuse.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `InlineOptions` and reports the run's outcome.

use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;

use htmlfuse::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OUTPUT};
use htmlfuse::{InlineOptions, inline_file};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Bundle index.html and everything it references into dist/single.html
  htmlfuse index.html

  # Explicit output path
  htmlfuse index.html -o build/portable.html

  # Assets resolved against a different directory
  htmlfuse site/index.html --base-dir site

Remote stylesheets, scripts and images (http:// or https:// references)
are fetched and embedded too. Assets that cannot be fetched are left as
external references and reported as warnings; the output file is still
written.
"#;

/// Bundle an HTML document and its referenced assets into one file.
#[derive(Parser, Debug)]
#[command(
    name = "htmlfuse",
    version,
    about = "Bundle an HTML document and its referenced assets into a single self-contained file",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input HTML file.
    input: PathBuf,

    /// Output file path.
    #[arg(short, long, env = "HTMLFUSE_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Base directory for resolving relative asset paths.
    #[arg(long, env = "HTMLFUSE_BASE_DIR", default_value = ".")]
    base_dir: PathBuf,

    /// HTTP timeout for remote assets, in seconds.
    #[arg(long, env = "HTMLFUSE_TIMEOUT", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    timeout: u64,

    /// Enable debug-level diagnostics.
    #[arg(short, long)]
    verbose: bool,

    /// Warnings and errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .target(env_logger::Target::Stdout)
        .init();

    if !cli.input.exists() {
        log::error!("Input file not found: {}", cli.input.display());
        std::process::exit(1);
    }

    let base_dir = std::fs::canonicalize(&cli.base_dir).unwrap_or_else(|_| cli.base_dir.clone());
    let options = InlineOptions {
        base_dir,
        http_timeout: Duration::from_secs(cli.timeout),
        ..InlineOptions::default()
    };

    match inline_file(&cli.input, &cli.output, &options) {
        Ok(report) => {
            if report.has_failures() {
                log::warn!(
                    "{} of {} assets could not be inlined",
                    report.failures.len(),
                    report.total()
                );
            }
            log::info!("Wrote single-file HTML to {}", cli.output.display());
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
