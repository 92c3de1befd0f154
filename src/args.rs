use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// valcss - compile utility classes found in HTML into plain CSS
#[derive(Parser, Debug)]
#[command(name = "valcss")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the configured files and build the stylesheet
    Build(BuildArgs),
    /// Write a default valcss.config.json in the current directory
    Init(InitArgs),
    /// Read markup from stdin and write CSS to stdout
    Pipe(PipeArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Configuration file path (JSON or YAML)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to configuration file (defaults to valcss.config.json/.yaml/.yml)"
    )]
    pub config: Option<PathBuf>,

    /// Stylesheet path, overriding the config's `output`
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path where the generated CSS file will be written in link mode"
    )]
    pub output: Option<String>,

    /// Watch mode (continuously watch for changes)
    #[arg(
        short = 'w',
        long = "watch",
        default_value_t = false,
        help = "Watch input files and the config, rebuilding on changes"
    )]
    pub watch: bool,

    /// Dry run (print CSS instead of injecting it)
    #[arg(
        long = "dry-run",
        default_value_t = false,
        help = "Print the generated CSS to stdout without touching any file"
    )]
    pub dry_run: bool,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,
}

/// Arguments for the init command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Format of the config file to create
    #[arg(
        long = "yaml",
        default_value_t = false,
        help = "Write valcss.config.yaml instead of valcss.config.json"
    )]
    pub yaml: bool,
}

/// Arguments for the pipe command
#[derive(Parser, Debug, Clone)]
pub struct PipeArgs {
    /// Keep comments in the input
    #[arg(
        long = "keep-comments",
        default_value_t = false,
        help = "Do not strip HTML and JS comments before extracting classes"
    )]
    pub keep_comments: bool,
}

impl BuildArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if let Some(output) = &self.output {
            if output.trim().is_empty() {
                return Err("Missing value for --output".to_string());
            }
        }

        if self.watch && self.dry_run {
            return Err("--watch and --dry-run cannot be combined".to_string());
        }

        Ok(())
    }
}
