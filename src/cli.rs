// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `sitepipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitepipe",
    version,
    about = "Build a static site, watch for changes and serve it with live reload.",
    long_about = None
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable production optimizations (CSS/JS minification, browser targets).
    #[arg(long, global = true)]
    pub production: bool,

    /// Path to the config file (TOML).
    ///
    /// Default: `Sitepipe.toml` in the current working directory, falling back
    /// to built-in defaults when the file does not exist.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITEPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,
}

/// Named pipeline entry points.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Clean the destination tree, then build, serve and watch.
    Build,
    /// Build once, start the reload server and re-run tasks on file changes.
    Watch,
    /// Delete the destination tree and the image transform cache.
    Clean,
    /// Delete the destination tree, keeping cached images.
    #[command(name = "clean:dist")]
    CleanDist,
    /// Compile stylesheets once.
    Styles,
    /// Render pages once.
    Pages,
    /// Optimize and copy images once.
    Images,
    /// Copy fonts once.
    Fonts,
    /// Copy (and in production, minify) scripts once.
    Scripts,
    /// Serve the destination tree without building.
    Serve,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
