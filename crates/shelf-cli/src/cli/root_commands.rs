use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect or discard saved drafts
    Draft {
        #[command(subcommand)]
        action: DraftCommands,
    },
    /// Upload images through the media pipeline and print the outcomes
    Upload(UploadArgs),
    /// Fill the wizard from a JSON form file, step by step, and submit it
    Run(RunArgs),
}

#[derive(Debug, Subcommand)]
pub enum DraftCommands {
    /// List every stored draft key
    List,
    /// Print the draft for a new entry, or for `--entity` when editing
    Show {
        #[arg(long)]
        entity: Option<String>,
    },
    /// Delete the draft for a new entry, or for `--entity`
    Discard {
        #[arg(long)]
        entity: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Image files, processed in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON file with form fields; omitted fields keep their current value
    pub form: Option<PathBuf>,

    /// Images to attach on the media step
    #[arg(long = "image", short = 'i')]
    pub images: Vec<PathBuf>,

    /// Edit an existing entity instead of creating one
    #[arg(long)]
    pub id: Option<String>,

    /// Restore the saved draft before applying the form file
    #[arg(long)]
    pub restore: bool,

    /// Save the draft and stop instead of submitting
    #[arg(long)]
    pub save_only: bool,
}
