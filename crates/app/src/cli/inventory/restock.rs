use clap::Args;
use kaha_app::context::AppContext;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RestockArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Product UUID to restock
    #[arg(long)]
    product: Uuid,

    /// Units received
    #[arg(long)]
    quantity: u32,
}

pub(crate) async fn run(args: RestockArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    let record = context
        .inventory
        .restock(args.product, args.quantity)
        .await
        .map_err(|error| format!("failed to restock {}: {error}", args.product))?;

    println!("product_uuid: {}", record.product_uuid);
    println!("quantity_in_stock: {}", record.quantity_in_stock);
    println!(
        "last_restocked_at: {}",
        record
            .last_restocked_at
            .map_or_else(|| "never".to_string(), |value| value.to_string())
    );

    if record.is_low() {
        println!(
            "warning: still at or below the minimum threshold ({})",
            record.minimum_threshold
        );
    }

    Ok(())
}
