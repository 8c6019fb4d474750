use clap::{Args, Subcommand};

mod restock;

#[derive(Debug, Args)]
pub(crate) struct InventoryCommand {
    #[command(subcommand)]
    command: InventorySubcommand,
}

#[derive(Debug, Subcommand)]
enum InventorySubcommand {
    Restock(restock::RestockArgs),
}

pub(crate) async fn run(command: InventoryCommand) -> Result<(), String> {
    match command.command {
        InventorySubcommand::Restock(args) => restock::run(args).await,
    }
}
