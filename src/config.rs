//! Caller-facing selection configuration.
//!
//! [`SelectionConfig`] is the raw, serde-deserializable form. It is resolved
//! into a typed [`SelectionPlan`] up front, so every configuration error is
//! reported before any selection work begins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::selection::neighbors::Tiebreaker;
use crate::types::{BudgetUnit, ConfigError};

pub const DEFAULT_ROUNDS: usize = 20;

/// Token sequence that stands in for an excluded sentence during delfy runs.
pub const DEFAULT_EXCLUSION_SENTINEL: [&str; 2] = ["<excluded>", "</s>"];

/// The ranking strategies available through the ranker factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankerKind {
    Length,
    Random,
    Weighted,
    Neighbors,
    CommonNeighbors,
}

impl RankerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankerKind::Length => "length",
            RankerKind::Random => "random",
            RankerKind::Weighted => "weighted",
            RankerKind::Neighbors => "neighbors",
            RankerKind::CommonNeighbors => "common-neighbors",
        }
    }
}

impl FromStr for RankerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "length" => Ok(RankerKind::Length),
            "random" => Ok(RankerKind::Random),
            "weighted" => Ok(RankerKind::Weighted),
            "neighbors" => Ok(RankerKind::Neighbors),
            "common-neighbors" => Ok(RankerKind::CommonNeighbors),
            other => Err(ConfigError::UnknownRanker(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Multi-round decay log-frequency selection.
    Delfy,
    /// A ranker followed by budget filling.
    Ranked(RankerKind),
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Delfy => "delfy",
            Strategy::Ranked(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delfy" => Ok(Strategy::Delfy),
            other => other.parse().map(Strategy::Ranked),
        }
    }
}

/// Raw selection configuration, as read from JSON or built by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    pub strategy: String,
    pub budget_percentage: f64,
    pub budget_unit: String,

    #[serde(default = "default_rounds")]
    pub rounds: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreaker: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_sentinel: Option<Vec<String>>,
}

fn default_rounds() -> usize {
    DEFAULT_ROUNDS
}

impl SelectionConfig {
    pub fn new(
        strategy: impl Into<String>,
        budget_percentage: f64,
        budget_unit: impl Into<String>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            budget_percentage,
            budget_unit: budget_unit.into(),
            rounds: DEFAULT_ROUNDS,
            tiebreaker: None,
            seed: None,
            exclusion_sentinel: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Validate every field and produce a typed plan.
    pub fn resolve(&self) -> Result<SelectionPlan, ConfigError> {
        let strategy: Strategy = self.strategy.parse()?;
        let unit: BudgetUnit = self.budget_unit.parse()?;

        if !(self.budget_percentage > 0.0 && self.budget_percentage <= 1.0) {
            return Err(ConfigError::InvalidBudgetPercentage(self.budget_percentage));
        }
        if strategy == Strategy::Delfy && self.rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }

        let tiebreaker = match &self.tiebreaker {
            Some(name) => name.parse()?,
            None => Tiebreaker::default_for(unit),
        };
        let exclusion_sentinel = self.exclusion_sentinel.clone().unwrap_or_else(|| {
            DEFAULT_EXCLUSION_SENTINEL
                .iter()
                .map(|token| token.to_string())
                .collect()
        });

        Ok(SelectionPlan {
            strategy,
            budget_percentage: self.budget_percentage,
            unit,
            rounds: self.rounds,
            tiebreaker,
            seed: self.seed,
            exclusion_sentinel,
        })
    }
}

/// A validated selection configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPlan {
    pub strategy: Strategy,
    pub budget_percentage: f64,
    pub unit: BudgetUnit,
    pub rounds: usize,
    pub tiebreaker: Tiebreaker,
    pub seed: Option<u64>,
    pub exclusion_sentinel: Vec<String>,
}
