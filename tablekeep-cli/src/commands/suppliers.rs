use clap::{Args, Subcommand};
use tablekeep_core::{seed, Supplier, SupplierPatch, SupplierView};

use super::{truncate, CommandResult, OutputFormat};
use crate::context::AppContext;

#[derive(Args)]
pub struct SupplierCommand {
    #[command(subcommand)]
    pub command: SupplierSubcommand,
}

#[derive(Subcommand)]
pub enum SupplierSubcommand {
    /// List suppliers
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Register a supplier
    Add {
        #[arg(long, short)]
        name: String,

        /// Contact person
        #[arg(long)]
        contact: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Ingredient ID the supplier delivers (can be repeated)
        #[arg(long = "ingredient", value_name = "ID")]
        ingredients: Vec<String>,
    },

    /// Change a supplier
    Update {
        id: String,

        #[arg(long, short)]
        name: Option<String>,

        #[arg(long)]
        contact: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Replaces the delivered ingredients (can be repeated)
        #[arg(long = "ingredient", value_name = "ID")]
        ingredients: Vec<String>,
    },

    /// Remove a supplier
    Delete { id: String },
}

impl SupplierCommand {
    pub async fn run(&self, ctx: &AppContext) -> CommandResult {
        let (resource, catalogs) = ctx.open::<Supplier>(seed::suppliers()).await;
        let engine = resource.engine();

        match &self.command {
            SupplierSubcommand::List { format } => {
                print_suppliers(&resource.views(&catalogs), *format)
            }
            SupplierSubcommand::Add {
                name,
                contact,
                email,
                phone,
                ingredients,
            } => {
                let patch = SupplierPatch {
                    name: Some(name.clone()),
                    contact_name: contact.clone(),
                    email: email.clone(),
                    phone: phone.clone(),
                    ingredient_ids: Some(ingredients.clone()),
                };
                super::create(engine, patch, "supplier").await
            }
            SupplierSubcommand::Update {
                id,
                name,
                contact,
                email,
                phone,
                ingredients,
            } => {
                let patch = SupplierPatch {
                    name: name.clone(),
                    contact_name: contact.clone(),
                    email: email.clone(),
                    phone: phone.clone(),
                    ingredient_ids: (!ingredients.is_empty()).then(|| ingredients.clone()),
                };
                super::update(engine, id, patch, "supplier").await
            }
            SupplierSubcommand::Delete { id } => super::delete(engine, id, "supplier").await,
        }
    }
}

fn print_suppliers(suppliers: &[SupplierView], format: OutputFormat) -> CommandResult {
    if suppliers.is_empty() {
        println!("No suppliers found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(suppliers)?);
        }
        OutputFormat::Text => {
            println!("{:<38}  {:<24}  {:<24}  INGREDIENTS", "ID", "NAME", "CONTACT");
            println!("{}", "-".repeat(110));
            for supplier in suppliers {
                println!(
                    "{:<38}  {:<24}  {:<24}  {}",
                    supplier.id,
                    truncate(&supplier.name, 24),
                    truncate(supplier.contact.as_deref().unwrap_or("-"), 24),
                    supplier.ingredient_names.join(", ")
                );
            }
            println!("\nTotal: {} supplier(s)", suppliers.len());
        }
    }

    Ok(())
}
