use std::collections::BTreeMap;

use tracing::info;

use crate::models::VisualizationKind;
use crate::session::Completion;

/// Highest score a learner can award themselves for a concept.
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEntry {
    pub best: u32,
    pub attempts: u32,
}

/// Completions recorded during this run. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    entries: BTreeMap<VisualizationKind, ProgressEntry>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completion. Returns true when it beats the previous best.
    pub fn record(&mut self, completion: Completion) -> bool {
        let score = completion.score.min(MAX_SCORE);
        let entry = self.entries.entry(completion.concept).or_insert(ProgressEntry {
            best: 0,
            attempts: 0,
        });
        entry.attempts += 1;
        let improved = entry.attempts == 1 || score > entry.best;
        if score > entry.best {
            entry.best = score;
        }
        info!(
            concept = completion.concept.id(),
            score,
            best = entry.best,
            attempts = entry.attempts,
            "progress recorded"
        );
        improved
    }

    pub fn best(&self, kind: VisualizationKind) -> Option<u32> {
        self.entries.get(&kind).map(|e| e.best)
    }

    pub fn completed(&self, kind: VisualizationKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn completed_count(&self) -> usize {
        self.entries.len()
    }

    /// One row per registered concept, in registry order.
    pub fn entries(&self) -> impl Iterator<Item = (VisualizationKind, Option<ProgressEntry>)> + '_ {
        VisualizationKind::all()
            .iter()
            .map(|&kind| (kind, self.entries.get(&kind).copied()))
    }
}
