//! Text rendering of run summaries.

use talent_flow_core::types::{MovementType, RunSummary};

pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = format!("run {}\n", summary.run_id);
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("  {label:<22}{value}\n"));
    };
    line("started", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        line("finished", finished.to_rfc3339());
    }
    line("processed", summary.processed.to_string());
    line("unchanged", summary.unchanged.to_string());
    line("baselined", summary.baselined.to_string());
    line("not active", summary.not_active.to_string());
    line("skipped malformed", summary.skipped_malformed.to_string());
    line("deferred", summary.deferred.to_string());
    for t in MovementType::ALL {
        line(&format!("movements ({t})"), summary.movements_of(t).to_string());
    }
    line("signals emitted", summary.signals_emitted.to_string());
    line("snapshots saved", summary.snapshots_saved.to_string());
    line("contradictions", summary.contradictions_detected.to_string());
    line("below threshold", summary.below_threshold.to_string());
    line("cooldown suppressed", summary.suppressed_cooldown.to_string());
    line("rate cap suppressed", summary.suppressed_rate_cap.to_string());
    line("persistence failures", summary.persistence_failures.to_string());
    if summary.cancelled {
        line("cancelled", "yes".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_render_lists_counts_per_type() {
        let mut summary = RunSummary::new("r-1", Utc::now());
        summary.processed = 3;
        summary.record_movement(MovementType::Hire);
        let text = render_summary(&summary);
        assert!(text.starts_with("run r-1\n"));
        assert!(text.contains("movements (hire)"));
        assert!(text.contains(&format!("{:<22}3", "processed")));
        assert!(!text.contains("cancelled"));
    }
}
