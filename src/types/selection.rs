use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::budget::BudgetUnit;

/// Set of selected sentence indices, iterated in ascending order.
pub type SelectionSet = BTreeSet<usize>;

/// Metadata describing the outcome of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionMetadata {
    pub strategy: String,
    pub budget_unit: BudgetUnit,
    pub budget: usize,

    pub sentences_considered: usize,
    pub sentences_selected: usize,
    pub tokens_selected: usize,
}

/// The final result of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Selected sentence indices, sorted ascending.
    pub indices: Vec<usize>,
    pub selection: SelectionMetadata,
}

/// Rejected configuration. Always raised before any selection work begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unrecognized budget unit: {0}")]
    UnknownBudgetUnit(String),

    #[error("Unrecognized ranker: {0}")]
    UnknownRanker(String),

    #[error("Unrecognized tiebreaker: {0}")]
    UnknownTiebreaker(String),

    #[error("Budget percentage must be in (0, 1], got {0}")]
    InvalidBudgetPercentage(f64),

    #[error("Number of rounds must be at least 1")]
    ZeroRounds,

    #[error("Neighbor-based strategies require a neighbor index")]
    MissingNeighborIndex,

    #[error("Invalid configuration document: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Excluded index {index} is outside a corpus of {corpus_size} sentences")]
    ExclusionOutOfRange { index: usize, corpus_size: usize },
}
