//! Terminal renderer for pipeline snapshots.
//!
//! One parameterized renderer draws the indicator strip, the stage cards,
//! and the run summary for every command; there are no per-stage layout
//! variants.

use contracts::{PipelineSnapshot, StageDetail, StageStatus, StageView};
use observability::RunMetricsSummary;

/// One-line progress strip, e.g. `[✓]─[✓]─[●3]─[4]─[5]─[6]─[7]`
pub fn indicator_strip(snapshot: &PipelineSnapshot) -> String {
    let cells: Vec<String> = snapshot
        .stages
        .iter()
        .map(|stage| match stage.status() {
            StageStatus::Complete => "[✓]".to_string(),
            StageStatus::Processing => format!("[●{}]", stage.id()),
            _ => format!("[{}]", stage.id()),
        })
        .collect();
    cells.join("─")
}

/// Render every stage card; expanded cards include the demo detail panel
pub fn stage_cards(snapshot: &PipelineSnapshot, force_expanded: bool) -> String {
    let mut out = String::new();
    for stage in &snapshot.stages {
        render_card(&mut out, stage, force_expanded || stage.state.expanded);
    }
    out
}

fn render_card(out: &mut String, stage: &StageView, expanded: bool) {
    let descriptor = stage.descriptor;
    let chevron = if expanded { "▼" } else { "▶" };

    out.push_str(&format!(
        "{} Stage {}: {} [{}] {}\n",
        chevron,
        descriptor.id,
        descriptor.title,
        stage.status().label().to_uppercase(),
        descriptor.size_figure(),
    ));
    out.push_str(&format!("    {}\n", descriptor.summary));

    if expanded {
        render_detail(out, stage);
        out.push_str(&format!(
            "    in: {}  out: {}  change: {}  time: {}\n",
            descriptor.size_in, descriptor.size_out, descriptor.size_change, descriptor.wall_time,
        ));
    }
}

fn render_detail(out: &mut String, stage: &StageView) {
    match &stage.descriptor.detail {
        StageDetail::DeIdentification { before, after, note } => {
            out.push_str(&format!("    ⚠ {}\n", note));
            out.push_str(&format!("    before: {}\n", before));
            out.push_str(&format!("    after:  {}\n", after));
        }
        StageDetail::Preprocessing { before, after, tokens } => {
            out.push_str(&format!("    before: {}\n", before.replace('\n', "\\n")));
            out.push_str(&format!("    after:  {}\n", after.replace('\n', "\\n")));
            out.push_str(&format!("    tokens: {}\n", tokens));
        }
        StageDetail::SnippetExtraction {
            keywords,
            reduction_pct,
        } => {
            out.push_str("    keywords found:\n");
            for (keyword, hits) in keywords.iter() {
                out.push_str(&format!("      {} ({})\n", keyword, hits));
            }
            out.push_str(&format!("    {}% reduction achieved\n", reduction_pct));
        }
        StageDetail::Inference { routing, fields } => {
            out.push_str(&format!("    routing: {:?}\n", routing));
            for (field, status, time) in fields.iter() {
                out.push_str(&format!("      {} - {} ({})\n", field, status, time));
            }
        }
        StageDetail::Validation { attempts } => {
            for (field, tries) in attempts.iter() {
                out.push_str(&format!("      {}: {}\n", field, tries.join(" → ")));
            }
        }
        StageDetail::CacheStorage { path, size, fields } => {
            out.push_str(&format!("    path: {}\n", path));
            out.push_str(&format!("    size: {} | fields: {}\n", size, fields));
        }
        StageDetail::Scoring {
            components,
            overall_confidence,
            mrs,
        } => {
            for (field, answer, confidence) in components.iter() {
                out.push_str(&format!(
                    "      {}: {} (conf {:.2})\n",
                    field, answer, confidence
                ));
            }
            out.push_str(&format!(
                "    overall confidence: {:.2} (lowest field) → mRS {}\n",
                overall_confidence, mrs
            ));
        }
    }
}

/// Print the end-of-run summary
pub fn print_run_summary(snapshot: &PipelineSnapshot, metrics: &RunMetricsSummary) {
    let stats = snapshot.run.note_stats();

    println!("\n╔══════════════════════════════════════════════╗");
    println!("║              Extraction Summary              ║");
    println!("╚══════════════════════════════════════════════╝\n");

    println!("📋 Note");
    println!("   ├─ Characters: {}", stats.chars);
    println!("   └─ Tokens (est.): {}", stats.tokens);

    println!("\n📊 Run");
    println!(
        "   ├─ Stages completed: {}",
        snapshot.count_with_status(StageStatus::Complete)
    );
    println!(
        "   ├─ Temperature: {:.1} (captured, unused)",
        snapshot.run.sampling.temperature
    );
    println!(
        "   ├─ Top-p: {:.2} (captured, unused)",
        snapshot.run.sampling.top_p
    );
    match snapshot.run.mrs_score {
        Some(score) => println!("   ├─ mRS score: {}", score),
        None => println!("   ├─ mRS score: pending"),
    }
    match snapshot.run.elapsed_display {
        Some(elapsed) => println!("   └─ Total time: {}", elapsed),
        None => println!("   └─ Total time: -"),
    }

    println!("\n{}", metrics);
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::StageId;

    #[test]
    fn test_indicator_strip_initial() {
        let strip = indicator_strip(&PipelineSnapshot::initial());
        assert_eq!(strip, "[1]─[2]─[3]─[4]─[5]─[6]─[7]");
    }

    #[test]
    fn test_stage_cards_show_all_seven() {
        let cards = stage_cards(&PipelineSnapshot::initial(), false);
        for id in StageId::all() {
            assert!(cards.contains(&format!("Stage {}:", id)));
        }
        // Stage 1 starts expanded, so its demo panel is visible
        assert!(cards.contains("Patient [NAME], DOB [DATE]..."));
        // Collapsed stages hide their panels
        assert!(!cards.contains("keywords found"));
    }

    #[test]
    fn test_force_expanded_shows_every_panel() {
        let cards = stage_cards(&PipelineSnapshot::initial(), true);
        assert!(cards.contains("keywords found"));
        assert!(cards.contains("weakness (42)"));
        assert!(cards.contains("mRS 3"));
    }
}
