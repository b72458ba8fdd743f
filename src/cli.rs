use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::platform::{expand_home, HostEnv};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "langextract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract JSON translation files from a Minecraft installation")]
#[command(
    long_about = "langextract finds the newest asset index of a Minecraft installation, \
                  selects its localization entries and copies them out of the \
                  content-addressed object store into a flat output directory."
)]
#[command(after_help = "EXAMPLES:\n  \
    langextract\n  \
    langextract --minecraft-dir ~/.minecraft --output-dir lang\n  \
    langextract --output-format json --report run.json\n  \
    langextract --dry-run -v")]
pub struct Cli {
    /// The Minecraft data directory (defaults to the platform location)
    #[arg(short = 's', long)]
    pub minecraft_dir: Option<PathBuf>,

    /// Where to place the extracted translation files (default: translations)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Logical path prefix of the assets to extract
    #[arg(long, help = "Asset path prefix to extract (default: minecraft/lang)")]
    pub prefix: Option<String>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Write a JSON extraction report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip checking copied sizes against the asset index
    #[arg(long)]
    pub no_verify_size: bool,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "List the files that would be extracted without copying them")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self, env: &HostEnv) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides(env);
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self, env: &HostEnv) -> CliOverrides {
        CliOverrides::new()
            .with_source_root(self.minecraft_dir.as_ref().map(|p| expand_home(p, env)))
            .with_output_dir(self.output_dir.as_ref().map(|p| expand_home(p, env)))
            .with_prefix(self.prefix.clone())
            .with_verify_size(if self.no_verify_size { Some(false) } else { None })
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
