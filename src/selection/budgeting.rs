use crate::selection::ranking::Ranker;
use crate::selection::tokenizer::{Tokenizer, WhitespaceTokenizer};
use crate::types::{Budget, BudgetUnit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetResult {
    /// Selected indices in ranking order.
    pub selected: Vec<usize>,
    pub tokens_used: usize,
}

/// Turns a ranking into a selection under a sentence or token cap.
#[derive(Debug, Default, Clone)]
pub struct BudgetFiller<K = WhitespaceTokenizer> {
    tokenizer: K,
}

impl<K: Tokenizer> BudgetFiller<K> {
    pub fn new(tokenizer: K) -> Self {
        Self { tokenizer }
    }

    pub fn fill<R: Ranker + ?Sized>(
        &self,
        ranker: &mut R,
        candidates: &[String],
        budget: Budget,
    ) -> BudgetResult {
        match budget.unit {
            BudgetUnit::Sentence => self.fill_sentence_budget(ranker, candidates, budget.amount),
            BudgetUnit::Token => self.fill_token_budget(ranker, candidates, budget.amount),
        }
    }

    /// The first `max_sentences` entries of the ranking, order unchanged.
    pub fn fill_sentence_budget<R: Ranker + ?Sized>(
        &self,
        ranker: &mut R,
        candidates: &[String],
        max_sentences: usize,
    ) -> BudgetResult {
        let selected: Vec<usize> = ranker
            .rank(candidates)
            .filter(|&index| in_range(index, candidates))
            .take(max_sentences)
            .collect();
        let tokens_used = selected
            .iter()
            .map(|&index| self.tokenizer.count_tokens(&candidates[index]))
            .sum();

        BudgetResult {
            selected,
            tokens_used,
        }
    }

    /// Walk the ranking, admitting candidates while the running token total
    /// stays strictly below `max_tokens`. Stops at the first candidate that
    /// does not fit.
    pub fn fill_token_budget<R: Ranker + ?Sized>(
        &self,
        ranker: &mut R,
        candidates: &[String],
        max_tokens: usize,
    ) -> BudgetResult {
        let mut selected = Vec::new();
        let mut tokens_used = 0;

        for index in ranker.rank(candidates) {
            if !in_range(index, candidates) {
                continue;
            }
            let token_count = self.tokenizer.count_tokens(&candidates[index]);
            if tokens_used + token_count < max_tokens {
                selected.push(index);
                tokens_used += token_count;
            } else {
                break;
            }
        }

        BudgetResult {
            selected,
            tokens_used,
        }
    }
}

fn in_range(index: usize, candidates: &[String]) -> bool {
    let valid = index < candidates.len();
    if !valid {
        tracing::warn!(
            index,
            candidates = candidates.len(),
            "ranker emitted an out-of-range index"
        );
    }
    valid
}

/// [`BudgetFiller::fill_sentence_budget`] with whitespace token counts.
pub fn fill_sentence_budget<R: Ranker + ?Sized>(
    ranker: &mut R,
    candidates: &[String],
    max_sentences: usize,
) -> Vec<usize> {
    BudgetFiller::new(WhitespaceTokenizer)
        .fill_sentence_budget(ranker, candidates, max_sentences)
        .selected
}

/// [`BudgetFiller::fill_token_budget`] with whitespace token counts.
pub fn fill_token_budget<R: Ranker + ?Sized>(
    ranker: &mut R,
    candidates: &[String],
    max_tokens: usize,
) -> Vec<usize> {
    BudgetFiller::new(WhitespaceTokenizer)
        .fill_token_budget(ranker, candidates, max_tokens)
        .selected
}
