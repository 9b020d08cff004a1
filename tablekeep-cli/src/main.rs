use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod context;

use commands::{
    CatalogCommand, ConfigCommand, InventoryCommand, MenuCommand, OrderCommand,
    RestaurantCommand, SupplierCommand,
};
use config::Config;
use context::AppContext;

#[derive(Parser)]
#[command(name = "tk")]
#[command(version)]
#[command(about = "Restaurant back office that keeps working offline", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Use cached data only, never contact the server
    #[arg(long, global = true)]
    offline: bool,

    /// More log output (-v info, -vv debug)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage ingredient stock
    Inventory(InventoryCommand),

    /// Manage purchase orders
    Orders(OrderCommand),

    /// Manage menus
    Menus(MenuCommand),

    /// Manage suppliers
    Suppliers(SupplierCommand),

    /// Manage restaurants
    Restaurants(RestaurantCommand),

    /// Show reference data
    Catalog(CatalogCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cmd.run(&config, cli_config_path),
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    let ctx = AppContext::connect(&config, cli.offline).await;
    match command {
        Commands::Inventory(cmd) => cmd.run(&ctx).await,
        Commands::Orders(cmd) => cmd.run(&ctx).await,
        Commands::Menus(cmd) => cmd.run(&ctx).await,
        Commands::Suppliers(cmd) => cmd.run(&ctx).await,
        Commands::Restaurants(cmd) => cmd.run(&ctx).await,
        Commands::Catalog(cmd) => cmd.run(&ctx).await,
        Commands::Config(_) => Ok(()),
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from(["tk", "-vv", "--offline", "inventory", "list", "--low"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.offline);
        assert!(matches!(cli.command, Some(Commands::Inventory(_))));
    }

    #[test]
    fn test_parse_order_lines() {
        let cli = Cli::parse_from([
            "tk",
            "orders",
            "add",
            "--restaurant",
            "r1",
            "--supplier",
            "s1",
            "--line",
            "i1:u1:20:3.25",
            "--line",
            "i2:u5:6:1",
        ]);
        let Some(Commands::Orders(cmd)) = cli.command else {
            panic!("expected orders command");
        };
        match cmd.command {
            commands::OrderSubcommand::Add { lines, .. } => assert_eq!(lines.len(), 2),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_catalog_kind() {
        let cli = Cli::parse_from(["tk", "catalog", "unit"]);
        let Some(Commands::Catalog(cmd)) = cli.command else {
            panic!("expected catalog command");
        };
        assert_eq!(cmd.kind, tablekeep_core::CatalogKind::Units);
        assert!(Cli::try_parse_from(["tk", "catalog", "spices"]).is_err());
    }
}
