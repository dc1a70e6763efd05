//! Highlight reel packing.
//!
//! Candidates are taken best-first. A candidate joins the reel only if the
//! running total plus its duration stays within the budget; ones that don't
//! fit are skipped, and packing stops once the budget is exactly met. The
//! reel therefore never exceeds its budget.

use vintel_models::{HighlightReel, ViralClipCandidate};

use crate::scoring::rank_order;

/// Tolerance when comparing summed durations against the budget.
const BUDGET_EPSILON: f64 = 1e-9;

/// Pack the best candidates into `budget` seconds, returned in time order.
pub fn build_highlight_reel(candidates: &[ViralClipCandidate], budget: f64) -> HighlightReel {
    let mut ranked: Vec<&ViralClipCandidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| rank_order(a, b));

    let mut selected: Vec<ViralClipCandidate> = Vec::new();
    let mut total = 0.0;

    for candidate in ranked {
        if total >= budget - BUDGET_EPSILON {
            break;
        }
        if total + candidate.duration <= budget + BUDGET_EPSILON {
            total += candidate.duration;
            selected.push(candidate.clone());
        }
    }

    selected.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let estimated_viral_score = if selected.is_empty() {
        0
    } else {
        let sum: u32 = selected.iter().map(|c| c.virality_score).sum();
        (sum as f64 / selected.len() as f64).round() as u32
    };

    HighlightReel {
        clips: selected,
        total_duration: total,
        estimated_viral_score,
    }
}
