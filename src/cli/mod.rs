//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - collect: Collect command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod collect;
pub mod completions;

pub use collect::CollectArgs;
pub use completions::CompletionsArgs;

/// license-collect - dependency license bundler
///
/// Collect the licenses and notices of a module's dependencies into one redistributable bundle.
#[derive(Parser, Debug)]
#[command(
    name = "license-collect",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Collect dependency licenses and notices into one bundle",
    long_about = "license-collect lists the dependencies of a Go module, detects the license of each \
                  one, merges dependencies that ship byte-identical license files, and writes an \
                  aggregated LICENSE, an aggregated NOTICE and one copy of every distinct license \
                  and notice file.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  license-collect collect --dependency ../service/go.mod                 \x1b[90m# Bundle into ./dependency-licenses\x1b[0m\n   \
                  license-collect collect --dependency go.mod --project-name \"Demo\"    \x1b[90m# Name the project in headers\x1b[0m\n   \
                  license-collect collect --dependency go.mod --jobs 8                   \x1b[90m# Detect licenses in parallel\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Working directory relative paths are resolved against (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "LICENSE_COLLECT_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect dependency licenses and notices into a bundle
    Collect(CollectArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
