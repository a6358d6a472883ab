//! Decay log-frequency ("delfy") scoring and single-round greedy selection.
//!
//! One [`DecayLogFrequency`] value is one round. Construction snapshots the
//! selected/unselected partitions and their token counts; [`DecayLogFrequency::run`]
//! scores every unselected sentence and admits the best ones under the round
//! budget. Multi-round driving lives in [`crate::selection::allocator`].

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use crate::selection::frequency::TokenFrequencyTable;
use crate::types::{Budget, BudgetUnit, SelectionSet, TokenizedCorpus};

/// Redundancy penalty strengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayParams {
    /// λ1: penalty per occurrence of a token in already-selected sentences.
    pub lambda_selected: f64,
    /// λ2: penalty per occurrence of a token in sentences scored earlier in
    /// the same round.
    pub lambda_uhat: f64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            lambda_selected: 1.0,
            lambda_uhat: 1.0,
        }
    }
}

/// Scores of one sentence from a round's evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredSentence {
    pub index: usize,
    pub lf: f64,
    pub delfy: f64,
}

pub struct DecayLogFrequency<'a, T> {
    corpus: &'a TokenizedCorpus<T>,
    selected: &'a SelectionSet,
    unselected: Vec<usize>,
    unselected_counts: TokenFrequencyTable<'a, T>,
    selected_counts: TokenFrequencyTable<'a, T>,
    params: DecayParams,
    budget: Budget,
    // Σ_v G(v|U), fixed for the round
    normalizer: f64,
}

impl<'a, T> DecayLogFrequency<'a, T>
where
    T: Eq + Hash + Clone,
{
    pub fn new(corpus: &'a TokenizedCorpus<T>, selected: &'a SelectionSet, budget: Budget) -> Self {
        Self::with_params(corpus, selected, budget, DecayParams::default())
    }

    pub fn with_params(
        corpus: &'a TokenizedCorpus<T>,
        selected: &'a SelectionSet,
        budget: Budget,
        params: DecayParams,
    ) -> Self {
        let unselected: Vec<usize> = (0..corpus.len())
            .filter(|i| !selected.contains(i))
            .collect();
        let unselected_counts =
            TokenFrequencyTable::from_indices(corpus, unselected.iter().copied());
        let selected_counts = TokenFrequencyTable::from_indices(
            corpus,
            selected.iter().copied().filter(|&i| i < corpus.len()),
        );

        // Summed in first-occurrence order so scores do not depend on hash
        // iteration order.
        let mut seen = HashSet::new();
        let normalizer = unselected
            .iter()
            .flat_map(|&index| corpus.sentence(index))
            .filter(|&token| seen.insert(token))
            .map(|token| ((unselected_counts.count(token) + 1) as f64).ln())
            .sum();

        Self {
            corpus,
            selected,
            unselected,
            unselected_counts,
            selected_counts,
            params,
            budget,
            normalizer,
        }
    }

    /// G(w|U): log-frequency of `token` in the unselected pool.
    pub fn log_frequency(&self, token: &T) -> f64 {
        ((self.unselected_counts.count(token) + 1) as f64).ln()
    }

    /// F(w|U): log-frequency normalized over the unselected vocabulary.
    pub fn normalized_frequency(&self, token: &T) -> f64 {
        if self.normalizer == 0.0 {
            return 0.0;
        }
        self.log_frequency(token) / self.normalizer
    }

    fn selected_decay(&self, token: &T) -> f64 {
        (-self.params.lambda_selected * self.selected_counts.count(token) as f64).exp()
    }

    /// Average normalized frequency of the sentence's tokens, discounted by
    /// coverage in the selected set. Only used to order the scoring pass.
    pub fn lf(&self, index: usize) -> f64 {
        let sentence = self.corpus.sentence(index);
        if sentence.is_empty() {
            return 0.0;
        }
        let total: f64 = sentence
            .iter()
            .map(|token| self.normalized_frequency(token) * self.selected_decay(token))
            .sum();
        total / sentence.len() as f64
    }

    pub fn decay(&self, token: &T, uhat_counts: &TokenFrequencyTable<'a, T>) -> f64 {
        self.selected_decay(token)
            * (-self.params.lambda_uhat * uhat_counts.count(token) as f64).exp()
    }

    pub fn delfy(&self, index: usize, uhat_counts: &TokenFrequencyTable<'a, T>) -> f64 {
        let sentence = self.corpus.sentence(index);
        if sentence.is_empty() {
            return 0.0;
        }
        let total: f64 = sentence
            .iter()
            .map(|token| self.normalized_frequency(token) * self.decay(token, uhat_counts))
            .sum();
        total / sentence.len() as f64
    }

    /// Score every unselected sentence, returned in descending delfy order.
    ///
    /// Sentences are scored in descending lf order, and each scored sentence
    /// joins uhat before the next is scored, so a sentence is penalized for
    /// overlapping with every sentence that ranked above it by lf.
    pub fn score(&self) -> Vec<ScoredSentence> {
        let mut scored: Vec<ScoredSentence> = self
            .unselected
            .iter()
            .map(|&index| ScoredSentence {
                index,
                lf: self.lf(index),
                delfy: 0.0,
            })
            .collect();
        scored.sort_by(|a, b| descending(a.lf, b.lf));

        let mut uhat_counts = TokenFrequencyTable::new();
        for entry in scored.iter_mut() {
            entry.delfy = self.delfy(entry.index, &uhat_counts);
            uhat_counts.add_sentence(self.corpus.sentence(entry.index));
        }

        scored.sort_by(|a, b| descending(a.delfy, b.delfy));
        scored
    }

    /// Run one round and return the newly selected indices.
    pub fn run(&self) -> SelectionSet {
        let ranked = self.score();
        let new_selected = self.admit(&ranked);

        debug_assert!(new_selected.is_disjoint(self.selected));
        tracing::debug!(
            candidates = ranked.len(),
            admitted = new_selected.len(),
            budget = self.budget.amount,
            unit = %self.budget.unit,
            "delfy round complete"
        );

        new_selected
    }

    fn admit(&self, ranked: &[ScoredSentence]) -> SelectionSet {
        let budget = self.budget.amount;
        let mut new_selected = SelectionSet::new();

        match self.budget.unit {
            BudgetUnit::Token => {
                let mut tokens_selected = 0;
                for entry in ranked {
                    if tokens_selected >= budget {
                        break;
                    }
                    let len = self.corpus.token_len(entry.index);
                    // A sentence that would meet or exceed the budget is skipped,
                    // not truncated; shorter ones further down may still fit.
                    if tokens_selected + len < budget {
                        new_selected.insert(entry.index);
                        tokens_selected += len;
                    }
                }
            }
            BudgetUnit::Sentence => {
                for entry in ranked {
                    if new_selected.len() >= budget {
                        break;
                    }
                    new_selected.insert(entry.index);
                }
            }
        }

        new_selected
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
