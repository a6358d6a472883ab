use chrono::{DateTime, Utc};

use crate::types::{BudgetUnit, CorpusFingerprint, SelectionResult};

// Written next to the index list so a selection can be traced back to the
// corpus and settings that produced it. Never read back by selection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SelectionManifest {
    pub corpus_fingerprint: CorpusFingerprint,
    pub strategy: String,
    pub budget_unit: BudgetUnit,
    pub budget: usize,
    pub sentences_considered: usize,
    pub sentences_selected: usize,
    pub tokens_selected: usize,
    pub created_at: DateTime<Utc>, // informational only
}

impl SelectionManifest {
    pub fn new(result: &SelectionResult, corpus_fingerprint: CorpusFingerprint) -> Self {
        let meta = &result.selection;
        Self {
            corpus_fingerprint,
            strategy: meta.strategy.clone(),
            budget_unit: meta.budget_unit,
            budget: meta.budget,
            sentences_considered: meta.sentences_considered,
            sentences_selected: meta.sentences_selected,
            tokens_selected: meta.tokens_selected,
            created_at: Utc::now(),
        }
    }
}
