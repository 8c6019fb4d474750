use clap::{Parser, Subcommand};
use kaha_app::config::LoggingConfig;

mod db;
mod inventory;

#[derive(Debug, Parser)]
#[command(name = "kaha-app", about = "Kaha point-of-sale operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Inventory(inventory::InventoryCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Inventory(command) => inventory::run(command).await,
        }
    }
}
