use clap::{Args, Subcommand};
use tablekeep_core::{seed, Menu, MenuItem, MenuPatch, MenuView};

use super::{CommandResult, OutputFormat};
use crate::context::AppContext;

#[derive(Args)]
pub struct MenuCommand {
    #[command(subcommand)]
    pub command: MenuSubcommand,
}

#[derive(Subcommand)]
pub enum MenuSubcommand {
    /// List menus and their dishes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a menu
    Add {
        /// Restaurant ID
        #[arg(long)]
        restaurant: String,

        #[arg(long, short)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Publish the menu right away
        #[arg(long)]
        active: bool,

        /// Dish as NAME:PRICE[:INGREDIENT,INGREDIENT...] (can be repeated)
        #[arg(long = "item", value_name = "ITEM", value_parser = parse_item)]
        items: Vec<MenuItem>,
    },

    /// Change a menu
    Update {
        id: String,

        #[arg(long, short)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        active: Option<bool>,

        /// Replaces all dishes; NAME:PRICE[:INGREDIENT,...] (can be repeated)
        #[arg(long = "item", value_name = "ITEM", value_parser = parse_item)]
        items: Vec<MenuItem>,
    },

    /// Remove a menu
    Delete { id: String },
}

impl MenuCommand {
    pub async fn run(&self, ctx: &AppContext) -> CommandResult {
        let (resource, catalogs) = ctx.open::<Menu>(seed::menus()).await;
        let engine = resource.engine();

        match &self.command {
            MenuSubcommand::List { format } => print_menus(&resource.views(&catalogs), *format),
            MenuSubcommand::Add {
                restaurant,
                name,
                description,
                active,
                items,
            } => {
                let patch = MenuPatch {
                    restaurant_id: Some(restaurant.clone()),
                    name: Some(name.clone()),
                    description: description.clone(),
                    active: Some(*active),
                    items: Some(items.clone()),
                };
                super::create(engine, patch, "menu").await
            }
            MenuSubcommand::Update {
                id,
                name,
                description,
                active,
                items,
            } => {
                let patch = MenuPatch {
                    name: name.clone(),
                    description: description.clone(),
                    active: *active,
                    items: (!items.is_empty()).then(|| items.clone()),
                    ..Default::default()
                };
                super::update(engine, id, patch, "menu").await
            }
            MenuSubcommand::Delete { id } => super::delete(engine, id, "menu").await,
        }
    }
}

/// Parses `NAME:PRICE[:INGREDIENT,INGREDIENT...]`.
fn parse_item(value: &str) -> Result<MenuItem, String> {
    let mut parts = value.splitn(3, ':');
    let name = parts.next().map(str::trim).unwrap_or_default();
    let price = parts
        .next()
        .ok_or_else(|| format!("Invalid item '{}'. Use NAME:PRICE[:INGREDIENTS].", value))?;
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|_| format!("Invalid price '{}'", price))?;
    let ingredients = parts
        .next()
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    Ok(MenuItem::new(name, price).with_ingredients(ingredients))
}

fn print_menus(menus: &[MenuView], format: OutputFormat) -> CommandResult {
    if menus.is_empty() {
        println!("No menus found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(menus)?);
        }
        OutputFormat::Text => {
            for menu in menus {
                let state = if menu.active { "active" } else { "inactive" };
                println!("{} ({}, {})", menu.name, menu.restaurant_name, state);
                println!("  ID: {}", menu.id);
                for item in &menu.items {
                    if item.ingredients.is_empty() {
                        println!("    - {:<28} {:>7.2}", item.name, item.price);
                    } else {
                        println!(
                            "    - {:<28} {:>7.2}  {}",
                            item.name,
                            item.price,
                            item.ingredients.join(", ")
                        );
                    }
                }
                println!();
            }
            println!("Total: {} menu(s)", menus.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_with_ingredients() {
        let item = parse_item("Caprese:11.5:i1, i2").unwrap();
        assert_eq!(item.name, "Caprese");
        assert_eq!(item.price, 11.5);
        assert_eq!(item.ingredient_ids, vec!["i1", "i2"]);
    }

    #[test]
    fn test_parse_item_without_ingredients() {
        let item = parse_item("Bread:4").unwrap();
        assert!(item.ingredient_ids.is_empty());
        assert!(parse_item("Bread").is_err());
        assert!(parse_item("Bread:cheap").is_err());
    }
}
