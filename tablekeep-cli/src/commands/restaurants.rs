use clap::{Args, Subcommand};
use tablekeep_core::{seed, Restaurant, RestaurantPatch, RestaurantView};

use super::{truncate, CommandResult, OutputFormat};
use crate::context::AppContext;

#[derive(Args)]
pub struct RestaurantCommand {
    #[command(subcommand)]
    pub command: RestaurantSubcommand,
}

#[derive(Subcommand)]
pub enum RestaurantSubcommand {
    /// List restaurants
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Open a restaurant
    Add {
        #[arg(long, short)]
        name: String,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        manager: Option<String>,

        #[arg(long)]
        seats: Option<u32>,
    },

    /// Change a restaurant
    Update {
        id: String,

        #[arg(long, short)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        manager: Option<String>,

        #[arg(long)]
        seats: Option<u32>,
    },

    /// Remove a restaurant
    Delete { id: String },
}

impl RestaurantCommand {
    pub async fn run(&self, ctx: &AppContext) -> CommandResult {
        let (resource, catalogs) = ctx.open::<Restaurant>(seed::restaurants()).await;
        let engine = resource.engine();

        match &self.command {
            RestaurantSubcommand::List { format } => {
                print_restaurants(&resource.views(&catalogs), *format)
            }
            RestaurantSubcommand::Add {
                name,
                address,
                phone,
                manager,
                seats,
            } => {
                let patch = RestaurantPatch {
                    name: Some(name.clone()),
                    address: address.clone(),
                    phone: phone.clone(),
                    manager: manager.clone(),
                    seats: *seats,
                };
                super::create(engine, patch, "restaurant").await
            }
            RestaurantSubcommand::Update {
                id,
                name,
                address,
                phone,
                manager,
                seats,
            } => {
                let patch = RestaurantPatch {
                    name: name.clone(),
                    address: address.clone(),
                    phone: phone.clone(),
                    manager: manager.clone(),
                    seats: *seats,
                };
                super::update(engine, id, patch, "restaurant").await
            }
            RestaurantSubcommand::Delete { id } => super::delete(engine, id, "restaurant").await,
        }
    }
}

fn print_restaurants(restaurants: &[RestaurantView], format: OutputFormat) -> CommandResult {
    if restaurants.is_empty() {
        println!("No restaurants found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(restaurants)?);
        }
        OutputFormat::Text => {
            println!("{:<38}  {:<24}  {:<30}  SEATS", "ID", "NAME", "ADDRESS");
            println!("{}", "-".repeat(104));
            for restaurant in restaurants {
                let seats = restaurant
                    .seats
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<38}  {:<24}  {:<30}  {}",
                    restaurant.id,
                    truncate(&restaurant.name, 24),
                    truncate(&restaurant.address, 30),
                    seats
                );
            }
            println!("\nTotal: {} restaurant(s)", restaurants.len());
        }
    }

    Ok(())
}
