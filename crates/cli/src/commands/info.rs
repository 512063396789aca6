//! `info` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use contracts::{stage_catalog, PipelineSnapshot};

use crate::cli::InfoArgs;
use crate::render;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!("Printing stage catalog");

    if args.json {
        let json = serde_json::to_string_pretty(stage_catalog())
            .context("Failed to serialize stage catalog")?;
        println!("{}", json);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               mRS Extraction Pipeline Stages                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let snapshot = PipelineSnapshot::initial();
    println!("{}", render::indicator_strip(&snapshot));
    println!();
    println!("{}", render::stage_cards(&snapshot, args.details));

    println!("All figures are demo constants; no clinical data is processed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_json_and_plain_run() {
        run_info(&InfoArgs {
            json: true,
            details: false,
        })
        .unwrap();
        run_info(&InfoArgs {
            json: false,
            details: true,
        })
        .unwrap();
    }
}
