use shelf_config::ShelfConfig;

use crate::cli::{Commands, GlobalFlags};

mod draft;
mod run;
mod upload;

pub async fn dispatch(
    command: Commands,
    config: &ShelfConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Draft { action } => draft::handle(&action, config, flags),
        Commands::Upload(args) => upload::handle(&args, config, flags).await,
        Commands::Run(args) => run::handle(&args, config, flags).await,
    }
}
