//! Manual Advance Demo
//!
//! Drives the progression by hand with `advance_stage`, printing each stage
//! card as it completes. Useful for stepping through transitions without the
//! timer.
//!
//! Run with: cargo run --bin manual_advance

use controller::{AdvanceOutcome, ControllerConfig, PipelineStageController};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let controller = PipelineStageController::with_config(ControllerConfig {
        animate: false,
        ..Default::default()
    });

    controller.start_run("Patient ambulates with assistance, partial self-care.")?;

    loop {
        let snapshot = controller.snapshot();
        if let Some(stage) = snapshot.run.current_stage {
            let descriptor = snapshot.stage(stage).descriptor;
            println!(
                "Stage {}: {} [{}]",
                descriptor.id,
                descriptor.title,
                descriptor.size_figure()
            );
        }

        match controller.advance_stage() {
            AdvanceOutcome::Advanced(_) => continue,
            AdvanceOutcome::Finished => break,
            AdvanceOutcome::NotRunning => unreachable!("run in flight"),
        }
    }

    let snapshot = controller.snapshot();
    println!(
        "Run complete: mRS {:?} in {:?}",
        snapshot.run.mrs_score, snapshot.run.elapsed_display
    );
    Ok(())
}
