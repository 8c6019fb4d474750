use clap::Args;
use kaha::fixtures::menu::menu_items;
use kaha_app::{
    context::AppContext,
    domain::catalog::{CatalogServiceError, models::NewProduct},
};

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Initial stock for each seeded product
    #[arg(long, default_value_t = 50)]
    stock: u32,

    /// Low-stock threshold for each seeded product
    #[arg(long, default_value_t = 10)]
    threshold: u32,
}

/// Seeds the standard menu and gives every product an inventory
/// record. Safe to re-run; existing products are left alone.
pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    let mut created = 0_usize;
    let mut skipped = 0_usize;

    for item in menu_items() {
        let result = context
            .catalog
            .create_product(NewProduct {
                uuid: item.id,
                name: item.name.clone(),
                category: item.category.clone(),
                price: item.unit_price,
            })
            .await;

        match result {
            Ok(product) => {
                context
                    .inventory
                    .set_stock(product.uuid, args.stock, args.threshold)
                    .await
                    .map_err(|error| {
                        format!("failed to set stock for {}: {error}", product.name)
                    })?;

                created += 1;
            }
            Err(CatalogServiceError::AlreadyExists) => skipped += 1,
            Err(error) => return Err(format!("failed to seed {}: {error}", item.name)),
        }
    }

    println!("seeded {created} products ({skipped} already present)");

    Ok(())
}
