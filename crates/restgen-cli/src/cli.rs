//! CLI argument definitions and parsing.
//!
//! - `Cli` - Main CLI entry point
//! - `GlobalArgs` - Options shared by every subcommand
//! - `Commands` - Available subcommands

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// restgen - turn REST API schemas into hosted tool functions.
///
/// Builds a service index, downloads the services' OpenAPI/Swagger
/// documents, generates one JavaScript tool per operation and publishes the
/// tools to a tool registry.
#[derive(Parser, Debug)]
#[command(name = "restgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,

    /// Pipeline location and configuration
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options locating the pipeline files.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (default: `restgen.toml` in the root, if present)
    #[arg(short, long, global = true, env = "RESTGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root that relative paths are resolved against
    #[arg(long, global = true, env = "RESTGEN_ROOT")]
    pub root: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the service index.
    ///
    /// Writes the curated list of production services. Schema URLs already
    /// recorded in an existing index are kept.
    ///
    /// # Examples
    ///
    /// ```bash
    /// restgen index
    /// restgen index --reset
    /// ```
    Index {
        /// Discard schema URLs recorded by earlier downloads
        #[arg(long)]
        reset: bool,
    },

    /// Download schema documents for every indexed service.
    ///
    /// Services that already have a valid document on disk are skipped. The
    /// URL each document was found at is written back into the index.
    ///
    /// # Examples
    ///
    /// ```bash
    /// restgen download
    /// SCHEMA_DOWNLOAD_DELAY_MS=500 restgen download
    /// ```
    Download {
        /// Pause between services in milliseconds
        #[arg(long = "delay-ms", env = "SCHEMA_DOWNLOAD_DELAY_MS")]
        delay_ms: Option<u64>,

        /// Base URL of the REST directory
        #[arg(long = "directory-url")]
        directory_url: Option<String>,
    },

    /// Generate tool functions and manifests from downloaded schemas.
    ///
    /// # Examples
    ///
    /// ```bash
    /// restgen generate
    /// restgen generate --tools-dir out/tools
    /// ```
    Generate {
        /// Output directory (default: `tools` in the root)
        #[arg(long = "tools-dir")]
        tools_dir: Option<PathBuf>,
    },

    /// Publish generated tools to the tool registry.
    ///
    /// Deletes stale generated tools, creates new ones and updates changed
    /// ones. Tools whose content matches the last publish are left alone.
    ///
    /// # Examples
    ///
    /// ```bash
    /// REGISTRY_API_KEY=... restgen publish --registry-url http://localhost:3000
    /// restgen publish --dry-run
    /// ```
    Publish {
        /// Base URL of the tool registry
        #[arg(long = "registry-url", env = "REGISTRY_API_URL")]
        registry_url: Option<String>,

        /// Registry API key, sent as a bearer token
        #[arg(long = "api-key", env = "REGISTRY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Additional remote tool names that must never be deleted
        #[arg(long = "keep", num_args = 1)]
        keep: Vec<String>,

        /// Show what would change without touching the registry
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completions.
    ///
    /// Prints a completion script for the given shell to stdout.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}
