//! Scripted Run Demo
//!
//! Drives a full timer-animated extraction run and prints each snapshot as
//! the progression advances. No CLI, no real clinical data.
//!
//! Run with: cargo run --bin scripted_run [config.toml]

use std::time::Duration;

use config_loader::ConfigLoader;
use contracts::StageStatus;
use controller::{ControllerConfig, PipelineStageController};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Scripted Run Demo");

    // ==== Stage 1: Use default config or load from file ====
    let config = if let Some(path) = std::env::args().nth(1) {
        tracing::info!(path = %path, "Loading dashboard config");
        ConfigLoader::load_from_path(std::path::Path::new(&path))?
    } else {
        contracts::DashboardConfig::default()
    };

    // Speed the animation up for the demo
    let mut controller_config = ControllerConfig::from(&config);
    controller_config.tick_interval = Duration::from_millis(300);

    // ==== Stage 2: Start the run ====
    let controller = PipelineStageController::with_config(controller_config);
    let mut redraw = controller.subscribe();

    controller.start_run("Patient presents with right-sided weakness and aphasia.")?;

    // ==== Stage 3: Follow the progression to completion ====
    while redraw.borrow().run.is_processing {
        redraw.changed().await?;
        let snapshot = redraw.borrow().clone();
        if let Some(stage) = snapshot.run.current_stage {
            let descriptor = snapshot.stage(stage).descriptor;
            tracing::info!(stage = %stage, title = descriptor.title, "processing");
        }
    }

    let snapshot = controller.snapshot();
    tracing::info!(
        completed = snapshot.count_with_status(StageStatus::Complete),
        mrs = ?snapshot.run.mrs_score,
        elapsed = ?snapshot.run.elapsed_display,
        "Run complete"
    );

    println!("{}", controller.metrics_summary());
    Ok(())
}
