use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::selection::ConfigError;

/// The unit a selection cap is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetUnit {
    Sentence,
    Token,
}

impl BudgetUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetUnit::Sentence => "sentence",
            BudgetUnit::Token => "token",
        }
    }
}

impl fmt::Display for BudgetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact match only: "Token" or " token" are rejected.
impl FromStr for BudgetUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentence" => Ok(BudgetUnit::Sentence),
            "token" => Ok(BudgetUnit::Token),
            other => Err(ConfigError::UnknownBudgetUnit(other.to_string())),
        }
    }
}

/// An absolute selection cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub unit: BudgetUnit,
    pub amount: usize,
}

impl Budget {
    pub fn sentences(amount: usize) -> Self {
        Self {
            unit: BudgetUnit::Sentence,
            amount,
        }
    }

    pub fn tokens(amount: usize) -> Self {
        Self {
            unit: BudgetUnit::Token,
            amount,
        }
    }

    /// `floor(percentage * total)`, where total is the sentence count or the
    /// token count of the corpus depending on `unit`.
    pub fn from_percentage(
        percentage: f64,
        unit: BudgetUnit,
        sentence_count: usize,
        token_count: usize,
    ) -> Result<Self, ConfigError> {
        if !(percentage > 0.0 && percentage <= 1.0) {
            return Err(ConfigError::InvalidBudgetPercentage(percentage));
        }
        let total = match unit {
            BudgetUnit::Sentence => sentence_count,
            BudgetUnit::Token => token_count,
        };
        let amount = (percentage * total as f64).floor() as usize;
        Ok(Self { unit, amount })
    }
}
