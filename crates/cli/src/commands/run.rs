//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use contracts::{DashboardConfig, SamplingParams};
use controller::{AdvanceOutcome, ControllerConfig, PipelineStageController};

use crate::cli::RunArgs;
use crate::render;

/// Execute the `run` command
pub async fn run_extraction(args: &RunArgs) -> Result<()> {
    let config = load_config(args)?;

    // Note text comes from --note or --note-file
    let note = read_note(args)?;
    if let Some(max_chars) = config.note.max_chars {
        let chars = note.chars().count();
        if chars > max_chars {
            anyhow::bail!("Clinical note too long: {chars} chars (max {max_chars})");
        }
    }

    let sampling = resolve_sampling(&config, args)?;

    // Metrics endpoint (optional)
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!(port = args.metrics_port, "Metrics endpoint available");
    }

    let mut controller_config = ControllerConfig::from(&config);
    if let Some(tick_ms) = args.tick_ms {
        controller_config.tick_interval = Duration::from_millis(tick_ms);
    }
    controller_config.animate = !args.no_animate;

    info!(
        tick_ms = controller_config.tick_interval.as_millis() as u64,
        animate = controller_config.animate,
        temperature = sampling.temperature,
        top_p = sampling.top_p,
        "Starting simulated extraction"
    );

    let controller = PipelineStageController::with_config(controller_config);
    let mut redraw = controller.subscribe();

    controller
        .start_run_with_sampling(&note, sampling)
        .context("Failed to start run")?;

    println!("{}", render::indicator_strip(&controller.snapshot()));

    if args.no_animate {
        // Drive the progression synchronously, one transition per call
        loop {
            let outcome = controller.advance_stage();
            println!("{}", render::indicator_strip(&controller.snapshot()));
            match outcome {
                AdvanceOutcome::Advanced(_) => continue,
                AdvanceOutcome::Finished | AdvanceOutcome::NotRunning => break,
            }
        }
    } else {
        // Follow the timer-driven progression until completion or Ctrl+C
        let shutdown = setup_shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                changed = redraw.changed() => {
                    changed.context("Controller dropped redraw channel")?;
                    let snapshot = redraw.borrow().clone();
                    println!("{}", render::indicator_strip(&snapshot));
                    if !snapshot.run.is_processing {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, cancelling run...");
                    controller.release_ticker();
                    break;
                }
            }
        }
    }

    let snapshot = controller.snapshot();
    println!("\n{}", render::stage_cards(&snapshot, false));
    render::print_run_summary(&snapshot, &controller.metrics_summary());

    info!("mRS Pipeline finished");
    Ok(())
}

/// Load configuration, falling back to defaults when the default path is absent
fn load_config(args: &RunArgs) -> Result<DashboardConfig> {
    if args.config.exists() {
        info!(config = %args.config.display(), "Loading configuration");
        config_loader::ConfigLoader::load_from_path(&args.config)
            .with_context(|| format!("Failed to load config from {}", args.config.display()))
    } else {
        info!(
            config = %args.config.display(),
            "Configuration file not found, using defaults"
        );
        Ok(DashboardConfig::default())
    }
}

/// Read the clinical note from CLI arguments
fn read_note(args: &RunArgs) -> Result<String> {
    if let Some(ref note) = args.note {
        return Ok(note.clone());
    }
    if let Some(ref path) = args.note_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read note from {}", path.display()));
    }
    anyhow::bail!("Provide the clinical note via --note or --note-file")
}

/// Merge config sampling defaults with CLI overrides
fn resolve_sampling(config: &DashboardConfig, args: &RunArgs) -> Result<SamplingParams> {
    let mut sampling = config.sampling;
    if let Some(temperature) = args.temperature {
        sampling.temperature = temperature;
    }
    if let Some(top_p) = args.top_p {
        sampling.top_p = top_p;
    }
    if !(0.0..=1.0).contains(&sampling.temperature) {
        anyhow::bail!("temperature must be within 0.0..=1.0");
    }
    if !(0.0..=1.0).contains(&sampling.top_p) {
        anyhow::bail!("top_p must be within 0.0..=1.0");
    }
    Ok(sampling)
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
