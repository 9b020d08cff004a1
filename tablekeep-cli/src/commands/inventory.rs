use clap::{Args, Subcommand};
use tablekeep_core::{seed, Enrich, InventoryItem, InventoryPatch, InventoryView, StockStatus};

use super::{truncate, CommandResult, OutputFormat};
use crate::context::AppContext;

#[derive(Args)]
pub struct InventoryCommand {
    #[command(subcommand)]
    pub command: InventorySubcommand,
}

#[derive(Subcommand)]
pub enum InventorySubcommand {
    /// List stock with its current status
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only items held by this restaurant (ID)
        #[arg(long)]
        restaurant: Option<String>,

        /// Only items that are low or out of stock
        #[arg(long)]
        low: bool,
    },

    /// Record stock of an ingredient
    Add {
        /// Restaurant ID
        #[arg(long)]
        restaurant: String,

        /// Ingredient ID
        #[arg(long)]
        ingredient: String,

        /// Unit ID
        #[arg(long)]
        unit: String,

        #[arg(long, short)]
        quantity: f64,

        /// Supplier ID
        #[arg(long)]
        supplier: Option<String>,

        /// Cost per unit
        #[arg(long)]
        cost: Option<f64>,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<String>,
    },

    /// Change an existing stock record
    Update {
        id: String,

        #[arg(long, short)]
        quantity: Option<f64>,

        /// Unit ID
        #[arg(long)]
        unit: Option<String>,

        /// Supplier ID
        #[arg(long)]
        supplier: Option<String>,

        /// Cost per unit
        #[arg(long)]
        cost: Option<f64>,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<String>,
    },

    /// Remove a stock record
    Delete { id: String },
}

impl InventoryCommand {
    pub async fn run(&self, ctx: &AppContext) -> CommandResult {
        let (resource, catalogs) = ctx.open::<InventoryItem>(seed::inventory_items()).await;
        let engine = resource.engine();

        match &self.command {
            InventorySubcommand::List {
                format,
                restaurant,
                low,
            } => {
                let items: Vec<InventoryView> = resource
                    .store()
                    .snapshot()
                    .iter()
                    .filter(|item| restaurant.as_ref().map_or(true, |r| &item.restaurant_id == r))
                    .filter(|item| !*low || item.status() != StockStatus::Available)
                    .map(|item| item.enrich(&catalogs))
                    .collect();
                print_items(&items, *format)
            }
            InventorySubcommand::Add {
                restaurant,
                ingredient,
                unit,
                quantity,
                supplier,
                cost,
                expires,
            } => {
                let patch = InventoryPatch {
                    restaurant_id: Some(restaurant.clone()),
                    ingredient_id: Some(ingredient.clone()),
                    unit_id: Some(unit.clone()),
                    supplier_id: supplier.clone(),
                    quantity: Some(*quantity),
                    cost_per_unit: *cost,
                    expiry_date: expires.as_deref().map(super::parse_date).transpose()?,
                };
                super::create(engine, patch, "inventory item").await
            }
            InventorySubcommand::Update {
                id,
                quantity,
                unit,
                supplier,
                cost,
                expires,
            } => {
                let patch = InventoryPatch {
                    unit_id: unit.clone(),
                    supplier_id: supplier.clone(),
                    quantity: *quantity,
                    cost_per_unit: *cost,
                    expiry_date: expires.as_deref().map(super::parse_date).transpose()?,
                    ..Default::default()
                };
                super::update(engine, id, patch, "inventory item").await
            }
            InventorySubcommand::Delete { id } => super::delete(engine, id, "inventory item").await,
        }
    }
}

fn print_items(items: &[InventoryView], format: OutputFormat) -> CommandResult {
    if items.is_empty() {
        println!("No inventory found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text => {
            println!(
                "{:<38}  {:<18}  {:>9}  {:<5}  {:<9}  RESTAURANT",
                "ID", "INGREDIENT", "QTY", "UNIT", "STATUS"
            );
            println!("{}", "-".repeat(100));
            for item in items {
                println!(
                    "{:<38}  {:<18}  {:>9.2}  {:<5}  {:<9}  {}",
                    item.id,
                    truncate(&item.ingredient_name, 18),
                    item.quantity,
                    item.unit_code,
                    item.status.to_string(),
                    item.restaurant_name
                );
            }
            println!("\nTotal: {} item(s)", items.len());
        }
    }

    Ok(())
}
