#![forbid(unsafe_code)]

mod output;

use std::env;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use hinline_core::config::{self, Overrides};
use hinline_core::{FsReader, InlineError, Inliner, MarkerStyle};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use output::OrderReport;

#[derive(Parser, Debug)]
#[command(
    name = "hinline",
    author,
    version,
    about = "hinline: inline local headers into one self-contained translation unit",
    long_about = "Reads a source file on stdin, inlines every header it reaches through \
                  quoted includes (dependencies first, each once), lifts system includes \
                  to the top, and writes the result to stdout."
)]
struct Cli {
    /// Directory quoted includes of the input are resolved against.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dir: Option<String>,

    /// Enable verbose logging (one line per header read).
    #[arg(short, long)]
    verbose: bool,

    /// Regex over resolved header paths; matching includes are kept verbatim.
    #[arg(short = 'x', long = "exclude", value_name = "REGEX")]
    excludes: Vec<String>,

    /// How headers are named in BEGIN/END markers: resolved | relative.
    #[arg(long, value_name = "STYLE")]
    markers: Option<MarkerStyle>,

    /// Print the resolved header order instead of the translation unit.
    #[arg(long)]
    order: bool,

    /// Emit the header order as JSON (with --order).
    #[arg(long, requires = "order")]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            include_dir: self.include_dir.clone(),
            excludes: self.excludes.clone(),
            markers: self.markers,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("HINLINE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "hinline=debug,warn"
        } else {
            "hinline=warn"
        })
    });

    let format = env::var("HINLINE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the translation unit; diagnostics go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let project_root = env::current_dir().context("cannot determine working directory")?;
    let config = config::resolve_config(&project_root, &cli.overrides())?;
    debug!(include_dir = %config.include_dir, excludes = config.excludes.len(), "starting");

    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("cannot read source from stdin")?;

    let inliner = Inliner::new(&config, FsReader)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.order {
        let plan = inliner.plan(&source)?;
        let report = OrderReport::from_plan(&plan);
        if cli.json {
            report.render_json(&mut out)?;
        } else {
            report.render_text(&mut out)?;
        }
    } else {
        let unit = inliner.inline(&source)?;
        out.write_all(unit.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(inline) = err.downcast_ref::<InlineError>() {
                debug!(summary = inline.summary(), hint = inline.hint(), "inlining failed");
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
