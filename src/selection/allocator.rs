use std::hash::Hash;

use crate::selection::delfy::{DecayLogFrequency, DecayParams};
use crate::types::{Budget, BudgetUnit, ConfigError, SelectionSet, TokenizedCorpus};

/// Splits a total budget across a fixed number of delfy rounds.
///
/// Round `i` (1-based) receives `floor(i*T/R) - floor((i-1)*T/R)`, so the
/// per-round budgets always sum to exactly `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetAllocator {
    total: Budget,
    rounds: usize,
}

impl BudgetAllocator {
    pub fn new(total: Budget, rounds: usize) -> Result<Self, ConfigError> {
        if rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(Self { total, rounds })
    }

    pub fn total(&self) -> Budget {
        self.total
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Nominal budget of a 1-based round.
    pub fn round_budget(&self, round: usize) -> usize {
        debug_assert!((1..=self.rounds).contains(&round));
        self.cumulative(round) - self.cumulative(round - 1)
    }

    pub fn budgets(&self) -> Vec<usize> {
        (1..=self.rounds).map(|round| self.round_budget(round)).collect()
    }

    fn cumulative(&self, round: usize) -> usize {
        // u128 keeps i*T from overflowing on large token totals
        (round as u128 * self.total.amount as u128 / self.rounds as u128) as usize
    }

    /// Run all rounds against `corpus`, returning the cumulative selection.
    pub fn run<T>(&self, corpus: &TokenizedCorpus<T>, params: DecayParams) -> SelectionSet
    where
        T: Eq + Hash + Clone,
    {
        let mut selected = SelectionSet::new();

        for round in 1..=self.rounds {
            let amount = match self.total.unit {
                // The last token round absorbs whatever earlier rounds left
                // unspent under the strict admission rule.
                BudgetUnit::Token if round == self.rounds => self
                    .total
                    .amount
                    .saturating_sub(corpus.tokens_in(&selected)),
                _ => self.round_budget(round),
            };
            tracing::debug!(
                round,
                budget = amount,
                unit = %self.total.unit,
                "starting delfy round"
            );

            let round_budget = Budget {
                unit: self.total.unit,
                amount,
            };
            let next_selected =
                DecayLogFrequency::with_params(corpus, &selected, round_budget, params).run();
            selected.extend(next_selected);
        }

        tracing::info!(
            rounds = self.rounds,
            selected = selected.len(),
            tokens = corpus.tokens_in(&selected),
            "delfy selection complete"
        );
        selected
    }
}

/// Select `budget_percentage` of `corpus` (measured in `unit`) over
/// `rounds` delfy rounds with the default decay parameters.
pub fn run_delfy<T>(
    corpus: &TokenizedCorpus<T>,
    budget_percentage: f64,
    unit: BudgetUnit,
    rounds: usize,
) -> Result<SelectionSet, ConfigError>
where
    T: Eq + Hash + Clone,
{
    let total = Budget::from_percentage(
        budget_percentage,
        unit,
        corpus.len(),
        corpus.total_tokens(),
    )?;
    let allocator = BudgetAllocator::new(total, rounds)?;
    Ok(allocator.run(corpus, DecayParams::default()))
}
