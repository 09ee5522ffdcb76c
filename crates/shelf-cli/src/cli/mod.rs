use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, DraftCommands, RunArgs, UploadArgs};

/// Top-level CLI parser for the `shelf` binary.
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about = "Shelf - catalog entry wizard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Tenant scope, overriding `tenant.scope`
    #[arg(long, global = true)]
    pub scope: Option<String>,

    /// Draft directory, overriding `draft.dir`
    #[arg(long, global = true)]
    pub draft_dir: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            scope: self.scope.clone(),
            draft_dir: self.draft_dir.clone(),
        }
    }
}
