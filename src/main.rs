mod cli;
mod config;
mod error;
mod extract;
mod indexer;
mod merge;
mod model;
mod report;
mod run;
mod util;

use std::io::{self, BufWriter};

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::IndexConfig;
use crate::error::{EXIT_FAILURE, exit_code};
use crate::extract::Poppler;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing();

    if let Err(err) = run(cli) {
        error!(error = %err, "index generation failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = IndexConfig::from_cli(cli);
    let extractor = Poppler::new()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run::run(&config, &extractor, &mut out)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
