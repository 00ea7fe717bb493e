//! Size catalog command

use anyhow::Result;
use tabled::Tabled;

use crate::config::Settings;
use crate::output::{format_currency, monthly_cost, print_info, OutputFormat};

/// Row for the catalog table
#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory (GiB)")]
    memory: String,
    #[tabled(rename = "Disk")]
    disk: String,
    #[tabled(rename = "Hourly")]
    hourly: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
}

/// Show the configured size catalog in priority order
pub fn show_catalog(settings: &Settings, format: OutputFormat) -> Result<()> {
    let catalog = settings.catalog()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&catalog)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let rows: Vec<CatalogRow> = catalog
                .iter()
                .map(|e| CatalogRow {
                    name: e.name.clone(),
                    cpu: format!("{}", e.cpu),
                    memory: format!("{}", e.memory),
                    disk: format!("{}", e.disk),
                    hourly: format_currency(e.hourly_cost, &settings.currency),
                    monthly: format_currency(monthly_cost(e.hourly_cost), &settings.currency),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            print_info(&format!("{} sizes configured", catalog.len()));
        }
    }

    Ok(())
}
