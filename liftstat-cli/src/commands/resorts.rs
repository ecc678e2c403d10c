//! Resorts command - list known resorts and their resolution plans.

use anyhow::Result;
use liftstat_providers::StatsRegistry;
use tracing::info;

use crate::config::ResortConfig;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the resorts command.
pub fn run(cli: &Cli) -> Result<()> {
    let config = ResortConfig::load_or_default(cli.config.as_deref())?;
    let dispatcher = StatsRegistry::dispatcher(&config.resorts);

    let planned = config
        .catalog()
        .into_iter()
        .map(|resort| {
            let plan = dispatcher.plan(&resort);
            (resort, plan)
        })
        .collect::<Vec<_>>();
    info!(resorts = planned.len(), "Listing resorts");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_resorts_header());
            println!("{}", "─".repeat(70));
            for (resort, plan) in &planned {
                println!("{}", formatter.format_plan(resort, plan));
            }
            println!();
            println!(
                "Total: {} resorts ({} configured, {} built-in strategies)",
                planned.len(),
                config.resorts.len(),
                StatsRegistry::count()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_resorts(&planned)?);
        }
    }

    Ok(())
}
