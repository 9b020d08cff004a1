use clap::{Args, Subcommand};
use tablekeep_core::{
    seed, Enrich, OrderLine, OrderStatus, PurchaseOrder, PurchaseOrderPatch, PurchaseOrderView,
};

use super::{truncate, CommandResult, OutputFormat};
use crate::context::AppContext;

#[derive(Args)]
pub struct OrderCommand {
    #[command(subcommand)]
    pub command: OrderSubcommand,
}

#[derive(Subcommand)]
pub enum OrderSubcommand {
    /// List purchase orders with their totals
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },

    /// Start a purchase order
    Add {
        /// Restaurant ID
        #[arg(long)]
        restaurant: String,

        /// Supplier ID
        #[arg(long)]
        supplier: String,

        /// Line as INGREDIENT:UNIT:QUANTITY:PRICE (can be repeated)
        #[arg(long = "line", value_name = "LINE", value_parser = parse_line)]
        lines: Vec<OrderLine>,

        /// Expected delivery date (YYYY-MM-DD)
        #[arg(long)]
        expected: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Append a line to an order
    AddLine {
        /// Order ID
        id: String,

        /// Ingredient ID
        #[arg(long)]
        ingredient: String,

        /// Unit ID
        #[arg(long)]
        unit: String,

        #[arg(long, short)]
        quantity: f64,

        /// Price per unit
        #[arg(long)]
        price: f64,
    },

    /// Move an order to another status
    Status {
        id: String,

        /// draft, submitted, received or cancelled
        status: OrderStatus,
    },

    /// Remove an order
    Delete { id: String },
}

impl OrderCommand {
    pub async fn run(&self, ctx: &AppContext) -> CommandResult {
        let (resource, catalogs) = ctx.open::<PurchaseOrder>(seed::purchase_orders()).await;
        let engine = resource.engine();

        match &self.command {
            OrderSubcommand::List { format, status } => {
                let orders: Vec<PurchaseOrderView> = resource
                    .store()
                    .snapshot()
                    .iter()
                    .filter(|order| status.map_or(true, |s| order.status == s))
                    .map(|order| order.enrich(&catalogs))
                    .collect();
                print_orders(&orders, *format)
            }
            OrderSubcommand::Add {
                restaurant,
                supplier,
                lines,
                expected,
                notes,
            } => {
                let patch = PurchaseOrderPatch {
                    restaurant_id: Some(restaurant.clone()),
                    supplier_id: Some(supplier.clone()),
                    status: Some(OrderStatus::Draft),
                    order_date: Some(chrono::Local::now().date_naive()),
                    expected_date: expected.as_deref().map(super::parse_date).transpose()?,
                    lines: Some(lines.clone()),
                    notes: notes.clone(),
                };
                super::create(engine, patch, "order").await
            }
            OrderSubcommand::AddLine {
                id,
                ingredient,
                unit,
                quantity,
                price,
            } => {
                let order = engine
                    .store()
                    .get(id)
                    .ok_or_else(|| format!("Order not found: {}", id))?;
                let mut lines = order.lines;
                lines.push(OrderLine::new(ingredient, unit, *quantity, *price));
                let patch = PurchaseOrderPatch {
                    lines: Some(lines),
                    ..Default::default()
                };
                super::update(engine, id, patch, "order").await
            }
            OrderSubcommand::Status { id, status } => {
                let patch = PurchaseOrderPatch {
                    status: Some(*status),
                    ..Default::default()
                };
                super::update(engine, id, patch, "order").await
            }
            OrderSubcommand::Delete { id } => super::delete(engine, id, "order").await,
        }
    }
}

/// Parses `INGREDIENT:UNIT:QUANTITY:PRICE`.
fn parse_line(value: &str) -> Result<OrderLine, String> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    let [ingredient, unit, quantity, price] = parts.as_slice() else {
        return Err(format!(
            "Invalid line '{}'. Use INGREDIENT:UNIT:QUANTITY:PRICE.",
            value
        ));
    };
    let quantity: f64 = quantity
        .parse()
        .map_err(|_| format!("Invalid quantity '{}'", quantity))?;
    let price: f64 = price
        .parse()
        .map_err(|_| format!("Invalid price '{}'", price))?;
    Ok(OrderLine::new(*ingredient, *unit, quantity, price))
}

fn print_orders(orders: &[PurchaseOrderView], format: OutputFormat) -> CommandResult {
    if orders.is_empty() {
        println!("No purchase orders found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(orders)?);
        }
        OutputFormat::Text => {
            println!(
                "{:<38}  {:<22}  {:<10}  {:>5}  {:>10}  RESTAURANT",
                "ID", "SUPPLIER", "STATUS", "LINES", "TOTAL"
            );
            println!("{}", "-".repeat(108));
            for order in orders {
                println!(
                    "{:<38}  {:<22}  {:<10}  {:>5}  {:>10.2}  {}",
                    order.id,
                    truncate(&order.supplier_name, 22),
                    order.status.to_string(),
                    order.lines.len(),
                    order.total,
                    order.restaurant_name
                );
            }
            println!("\nTotal: {} order(s)", orders.len());
        }
    }

    Ok(())
}
