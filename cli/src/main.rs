#![deny(missing_docs)]

//! # apidoc CLI
//!
//! Generates an OpenAPI 3.0 document from an API interface description.
//!
//! Diagnostics go to stderr and are filtered with `RUST_LOG` (default
//! `warn`), so `--output -` keeps stdout clean.

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI generator for API interface descriptions")]
struct Cli {
    #[clap(flatten)]
    generate: generate::GenerateArgs,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    generate::execute(&cli.generate)
}
