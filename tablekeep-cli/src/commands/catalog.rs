use clap::Args;
use tablekeep_core::CatalogKind;

use super::{CommandResult, OutputFormat};
use crate::context::AppContext;

#[derive(Args)]
pub struct CatalogCommand {
    /// restaurants, ingredients, units or suppliers
    pub kind: CatalogKind,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CatalogCommand {
    pub async fn run(&self, ctx: &AppContext) -> CommandResult {
        let entries = ctx.catalogs().get(self.kind).await;

        if entries.is_empty() {
            println!("No {} found", self.kind);
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(entries.as_slice())?);
            }
            OutputFormat::Text => {
                println!("{:<38}  {:<30}  CODE", "ID", "NAME");
                println!("{}", "-".repeat(80));
                for entry in entries.iter() {
                    println!(
                        "{:<38}  {:<30}  {}",
                        entry.id,
                        entry.name.as_deref().unwrap_or("-"),
                        entry.code.as_deref().unwrap_or("-")
                    );
                }
                if ctx.is_offline() {
                    println!("\n(bundled list, server not used)");
                }
            }
        }

        Ok(())
    }
}
