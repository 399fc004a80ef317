use clap::{Args, Parser, Subcommand, ValueEnum};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "json-hydrate.toml";

#[derive(Debug, Clone, Parser)]
#[command(name = "json-hydrate")]
#[command(about = "Hydrate loosely-typed JSON into records shaped by a template")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Hydrate a JSON file against a template declared in the configuration
    Hydrate(HydrateArgs),
    /// Look a movie up on the configured API
    Movie(MovieArgs),
}

#[derive(Debug, Clone, Args)]
pub struct HydrateArgs {
    /// Name of a [templates.<name>] table in the configuration
    #[arg(short, long)]
    pub template: String,

    /// Input JSON file; reads stdin when omitted
    #[arg(short, long)]
    pub input: Option<String>,

    /// Treat the input as a single record instead of a collection
    #[arg(long)]
    pub single: bool,

    /// Skip records that fail hydration (overrides the configuration)
    #[arg(long)]
    pub ignore_errors: bool,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file; writes stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct MovieArgs {
    /// Movie title, or search text with --search
    #[arg(short, long)]
    pub title: String,

    /// Search by title instead of fetching one movie
    #[arg(long)]
    pub search: bool,

    /// Skip search results that fail hydration (overrides the configuration)
    #[arg(long)]
    pub ignore_errors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}
