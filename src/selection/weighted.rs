//! Length-weighted random sampling without replacement.
//!
//! Sentences are drawn with probability proportional to their token count.
//! Each round draws a multinomial sample against the current weights, clamps
//! sentences drawn more than once back to a single selection, zeroes the
//! weight of everything drawn so far and renormalizes. Rounds repeat until
//! the budget is met or no weight mass is left.

use std::cmp::Ordering;

use rand::distributions::{Distribution, Open01, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::selection::ranking::{Ranker, Ranking};
use crate::selection::tokenizer::{Tokenizer, WhitespaceTokenizer};
use crate::types::SelectionSet;

/// A token-budget sample this close under budget is accepted as-is.
pub const TOKEN_TOLERANCE: i64 = 20;

/// Token-budget rounds draw only this fraction of the expected number of
/// sentences still needed, which keeps overshoot rare.
pub const TOKEN_UNDERDRAW: f64 = 0.8;

/// A probability mass function over sentences.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingWeights {
    weights: Vec<f64>,
}

impl SamplingWeights {
    /// `weight[i] = lengths[i] / Σ lengths`. All zero when the corpus has no
    /// tokens at all.
    pub fn from_lengths(lengths: &[usize]) -> Self {
        let total: usize = lengths.iter().sum();
        let weights = if total == 0 {
            vec![0.0; lengths.len()]
        } else {
            lengths
                .iter()
                .map(|&len| len as f64 / total as f64)
                .collect()
        };
        Self { weights }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.weights
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn zero(&mut self, index: usize) {
        self.weights[index] = 0.0;
    }

    /// Rescale so the weights sum to 1. Returns false, leaving the weights
    /// untouched, when no mass remains.
    pub fn renormalize(&mut self) -> bool {
        let total = self.total();
        if total <= 0.0 {
            return false;
        }
        let adjustor = 1.0 / total;
        for weight in &mut self.weights {
            *weight *= adjustor;
        }
        true
    }

    /// Multinomial draw of `n` samples: the number of times each sentence was
    /// drawn. `None` when no mass remains.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Option<Vec<usize>> {
        let dist = WeightedIndex::new(&self.weights).ok()?;
        let mut draws = vec![0; self.weights.len()];
        for _ in 0..n {
            draws[dist.sample(rng)] += 1;
        }
        Some(draws)
    }

    /// Every index with positive weight, in the order of successive weighted
    /// draws without replacement.
    ///
    /// Uses Gumbel-top-k: each index gets the key `ln w - ln(-ln u)` and keys
    /// are sorted descending. The first position is drawn with probability
    /// proportional to weight, the next from what remains, and so on.
    pub fn draw_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut keyed: Vec<(usize, f64)> = self
            .weights
            .iter()
            .enumerate()
            .filter(|&(_, &weight)| weight > 0.0)
            .map(|(index, &weight)| {
                let u: f64 = rng.sample(Open01);
                (index, weight.ln() - (-u.ln()).ln())
            })
            .collect();
        keyed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        keyed.into_iter().map(|(index, _)| index).collect()
    }
}

/// Draw distinct sentences until `budget` of them are selected.
///
/// Returns the selected indices in the order they were drawn: sentences from
/// earlier rounds first, ascending index within a round. Stops early, with
/// fewer than `budget` sentences, once every sentence with tokens is taken.
pub fn sample_by_sentences<R: Rng + ?Sized>(
    rng: &mut R,
    lengths: &[usize],
    budget: usize,
) -> Vec<usize> {
    let mut weights = SamplingWeights::from_lengths(lengths);
    let mut counts = vec![0usize; lengths.len()];
    let mut order = Vec::new();
    let mut num_selected = 0usize;
    let mut rounds = 0usize;

    while num_selected < budget {
        let remaining = budget - num_selected;
        let Some(draws) = weights.draw(rng, remaining) else {
            tracing::warn!(
                budget,
                selected = num_selected,
                "weighted sampler ran out of sentences before meeting the budget"
            );
            break;
        };
        rounds += 1;

        for (index, &drawn) in draws.iter().enumerate() {
            if drawn > 0 && counts[index] == 0 {
                order.push(index);
            }
            counts[index] += drawn;
            num_selected += drawn;
        }
        clamp_duplicates(&mut counts, &mut weights, |_, excess| num_selected -= excess);
        weights.renormalize();
    }

    tracing::debug!(rounds, selected = num_selected, budget, "sentence-budget sample complete");
    order
}

/// Draw distinct sentences until their token total is within
/// [`TOKEN_TOLERANCE`] under `budget`, never over it.
pub fn sample_by_tokens<R: Rng + ?Sized>(
    rng: &mut R,
    lengths: &[usize],
    budget: usize,
) -> SelectionSet {
    let total_tokens: usize = lengths.iter().sum();
    if total_tokens == 0 || budget == 0 {
        return SelectionSet::new();
    }

    let avg_sentences_per_token = lengths.len() as f64 / total_tokens as f64;
    let budget = budget as i64;
    let mut weights = SamplingWeights::from_lengths(lengths);
    let mut counts = vec![0usize; lengths.len()];
    let mut tokens_selected: i64 = 0;
    let mut remaining = budget;
    let mut rounds = 0usize;

    while remaining > 0 {
        // At least one draw, or a small remainder would spin forever.
        let expected = TOKEN_UNDERDRAW * remaining as f64 * avg_sentences_per_token;
        let draw_size = (expected.floor() as usize).max(1);
        let Some(draws) = weights.draw(rng, draw_size) else {
            tracing::warn!(
                budget,
                tokens_selected,
                "weighted sampler ran out of sentences before meeting the budget"
            );
            break;
        };
        rounds += 1;

        for (index, &drawn) in draws.iter().enumerate() {
            counts[index] += drawn;
            tokens_selected += (drawn * lengths[index]) as i64;
        }
        clamp_duplicates(&mut counts, &mut weights, |index, excess| {
            tokens_selected -= (excess * lengths[index]) as i64;
        });
        weights.renormalize();

        remaining = budget - tokens_selected;
        if (0..=TOKEN_TOLERANCE).contains(&remaining) {
            break;
        }
        while remaining < 0 {
            // Overshoot: give back already-selected sentences, lowest index
            // first. Their weights stay zero so they are not redrawn.
            let Some(index) = counts.iter().position(|&count| count == 1) else {
                break;
            };
            counts[index] = 0;
            tokens_selected -= lengths[index] as i64;
            remaining = budget - tokens_selected;
        }
    }

    tracing::debug!(rounds, tokens_selected, budget, "token-budget sample complete");
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count == 1)
        .map(|(index, _)| index)
        .collect()
}

/// Zero the weight of every drawn sentence and clamp multiple draws to one,
/// reporting each clamped sentence and its excess draw count.
fn clamp_duplicates<F>(counts: &mut [usize], weights: &mut SamplingWeights, mut on_excess: F)
where
    F: FnMut(usize, usize),
{
    for (index, count) in counts.iter_mut().enumerate() {
        if *count > 0 {
            weights.zero(index);
        }
        if *count > 1 {
            on_excess(index, *count - 1);
            *count = 1;
        }
    }
}

/// Ranks and samples sentences with probability proportional to length.
#[derive(Debug, Clone)]
pub struct WeightedRandomRanker<K = WhitespaceTokenizer> {
    tokenizer: K,
    rng: ChaCha8Rng,
}

impl WeightedRandomRanker<WhitespaceTokenizer> {
    pub fn new() -> Self {
        Self::with_tokenizer(WhitespaceTokenizer, ChaCha8Rng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_tokenizer(WhitespaceTokenizer, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for WeightedRandomRanker<WhitespaceTokenizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Tokenizer> WeightedRandomRanker<K> {
    pub fn with_tokenizer(tokenizer: K, rng: ChaCha8Rng) -> Self {
        Self { tokenizer, rng }
    }

    fn lengths(&self, sentences: &[String]) -> Vec<usize> {
        sentences
            .iter()
            .map(|sentence| self.tokenizer.count_tokens(sentence))
            .collect()
    }

    /// Initial sampling probability of every sentence.
    pub fn weights(&self, sentences: &[String]) -> Vec<f64> {
        SamplingWeights::from_lengths(&self.lengths(sentences)).into_vec()
    }

    /// Sample up to `max_sentences` distinct sentences.
    pub fn sample_sentence_budget(
        &mut self,
        sentences: &[String],
        max_sentences: usize,
    ) -> SelectionSet {
        let lengths = self.lengths(sentences);
        sample_by_sentences(&mut self.rng, &lengths, max_sentences)
            .into_iter()
            .collect()
    }

    /// Sample distinct sentences whose token total lands within tolerance of
    /// `max_tokens` without exceeding it.
    pub fn sample_token_budget(
        &mut self,
        sentences: &[String],
        max_tokens: usize,
    ) -> SelectionSet {
        let lengths = self.lengths(sentences);
        sample_by_tokens(&mut self.rng, &lengths, max_tokens)
    }
}

impl<K: Tokenizer> Ranker for WeightedRandomRanker<K> {
    /// Every sentence with tokens in weighted draw order, then empty sentences
    /// in corpus order. Any prefix of the ranking is a length-weighted sample.
    fn rank(&mut self, sentences: &[String]) -> Ranking {
        let lengths = self.lengths(sentences);

        let mut order = SamplingWeights::from_lengths(&lengths).draw_order(&mut self.rng);
        order.extend(
            lengths
                .iter()
                .enumerate()
                .filter(|&(_, &len)| len == 0)
                .map(|(index, _)| index),
        );
        Ranking::new(order)
    }
}
