//! license-collect - dependency license bundler
//!
//! Lists the dependencies of a Go module, detects each dependency's license,
//! merges dependencies that ship byte-identical license or notice files and
//! writes an aggregated LICENSE and NOTICE plus one copy of every distinct
//! file into an output directory.

use clap::Parser;
use std::path::PathBuf;

mod aggregate;
mod bundle;
mod cli;
mod commands;
mod config;
mod detector;
mod domain;
mod error;
mod hash;
mod lister;
mod logging;
mod pipeline;
mod process;
mod progress;
mod transaction;

use cli::{Cli, Commands};
use error::{LicenseCollectError, Result};

/// Directory relative paths are resolved against
fn working_dir(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| LicenseCollectError::IoError {
            message: format!("Failed to get current directory: {}", e),
        }),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Collect(args) => {
            working_dir(cli.workspace).and_then(|dir| commands::collect::run(&dir, args))
        }
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
