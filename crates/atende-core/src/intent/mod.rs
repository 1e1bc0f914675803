//! Intent scorer — keyword-based, zero-cost classification.
//!
//! Scores a message against every catalog rule and produces an
//! `(intent, confidence)` pair without any model call. Confidence is
//! hit density: short messages with a single trigger word already reach
//! full confidence, long messages need proportionally more hits.

use crate::catalog::{Catalog, Intent};
use std::sync::Arc;
use tracing::debug;

/// Confidence reported when no pattern fires at all. Low but nonzero,
/// so "nothing matched" is distinguishable from a genuine zero score.
pub const NO_MATCH_CONFIDENCE: f32 = 0.3;

pub struct IntentScorer {
    catalog: Arc<Catalog>,
}

impl IntentScorer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Score a message. Always returns a valid pair; an empty message
    /// yields `(Default, NO_MATCH_CONFIDENCE)`.
    ///
    /// Per rule: count non-overlapping whole-word matches, divide by
    /// the word count (floored at 1), double, clamp to 1.0. Ties keep
    /// the first-declared catalog entry.
    pub fn score(&self, message: &str) -> (Intent, f32) {
        let lower = message.to_lowercase();
        let words = lower.split_whitespace().count().max(1);

        let mut best: Option<(Intent, f32)> = None;

        for entry in self.catalog.entries() {
            let Some(rule) = entry.rule() else { continue };

            let hits = rule.find_iter(&lower).count();
            if hits == 0 {
                continue;
            }

            let raw = hits as f32 / words as f32;
            let confidence = (raw * 2.0).min(1.0);

            // Strictly-greater comparison keeps the earlier entry on ties.
            if best.map_or(true, |(_, c)| confidence > c) {
                best = Some((entry.intent(), confidence));
            }
        }

        let (intent, confidence) = best.unwrap_or((Intent::Default, NO_MATCH_CONFIDENCE));

        debug!(
            intent = intent.as_str(),
            confidence,
            words,
            "Scored message"
        );

        (intent, confidence)
    }
}
