use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::selection::ranking::{Ranker, Ranking};
use crate::selection::tokenizer::{Tokenizer, WhitespaceTokenizer};
use crate::types::{BudgetUnit, ConfigError};

/// Nearest-neighbor lookup over a corpus, typically backed by sentence
/// embeddings.
pub trait NeighborIndex {
    /// For each query sentence, the corpus index of its closest neighbor
    /// other than itself, or `None` if it has none.
    fn closest(&self, sentences: &[String]) -> Vec<Option<usize>>;
}

impl<I: NeighborIndex + ?Sized> NeighborIndex for Arc<I> {
    fn closest(&self, sentences: &[String]) -> Vec<Option<usize>> {
        (**self).closest(sentences)
    }
}

impl<I: NeighborIndex + ?Sized> NeighborIndex for &I {
    fn closest(&self, sentences: &[String]) -> Vec<Option<usize>> {
        (**self).closest(sentences)
    }
}

/// How sentences with equal neighbor counts are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tiebreaker {
    /// Longer sentences first.
    Length,
    /// Seeded shuffle.
    Random,
}

impl Tiebreaker {
    /// Length when filling a sentence budget, random when filling a token
    /// budget.
    pub fn default_for(unit: BudgetUnit) -> Self {
        match unit {
            BudgetUnit::Sentence => Tiebreaker::Length,
            BudgetUnit::Token => Tiebreaker::Random,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tiebreaker::Length => "length",
            Tiebreaker::Random => "random",
        }
    }
}

impl fmt::Display for Tiebreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tiebreaker {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "length" => Ok(Tiebreaker::Length),
            "random" => Ok(Tiebreaker::Random),
            other => Err(ConfigError::UnknownTiebreaker(other.to_string())),
        }
    }
}

/// Ranks sentences by how many other sentences name them as their closest
/// neighbor. Sentences nobody points at are left out of the ranking.
pub struct NeighborRanker<I, K = WhitespaceTokenizer> {
    index: I,
    tiebreaker: Tiebreaker,
    tokenizer: K,
    rng: ChaCha8Rng,
}

impl<I: NeighborIndex> NeighborRanker<I, WhitespaceTokenizer> {
    pub fn new(index: I, tiebreaker: Tiebreaker) -> Self {
        Self::with_tokenizer(index, tiebreaker, WhitespaceTokenizer, ChaCha8Rng::from_entropy())
    }

    pub fn seeded(index: I, tiebreaker: Tiebreaker, seed: u64) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self::with_tokenizer(index, tiebreaker, WhitespaceTokenizer, rng)
    }
}

impl<I: NeighborIndex, K: Tokenizer> NeighborRanker<I, K> {
    pub fn with_tokenizer(index: I, tiebreaker: Tiebreaker, tokenizer: K, rng: ChaCha8Rng) -> Self {
        Self {
            index,
            tiebreaker,
            tokenizer,
            rng,
        }
    }

    /// Number of times each corpus index is some sentence's closest neighbor.
    pub fn neighbor_counts(&self, sentences: &[String]) -> BTreeMap<usize, usize> {
        let queries: Vec<String> = sentences
            .iter()
            .filter(|sentence| !sentence.is_empty())
            .cloned()
            .collect();

        let mut counts = BTreeMap::new();
        for closest in self.index.closest(&queries).into_iter().flatten() {
            if closest < sentences.len() {
                *counts.entry(closest).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl<I: NeighborIndex, K: Tokenizer> Ranker for NeighborRanker<I, K> {
    fn rank(&mut self, sentences: &[String]) -> Ranking {
        let mut ranked: Vec<(usize, usize)> = self.neighbor_counts(sentences).into_iter().collect();

        match self.tiebreaker {
            Tiebreaker::Length => {
                let tokenizer = &self.tokenizer;
                ranked.sort_by_key(|&(index, _)| {
                    std::cmp::Reverse(tokenizer.count_tokens(&sentences[index]))
                });
            }
            Tiebreaker::Random => ranked.shuffle(&mut self.rng),
        }
        // stable: ties keep the tiebreaker order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked.into_iter().map(|(index, _)| index).collect()
    }
}

/// Keeps only sentences that at least two others name as their closest
/// neighbor, shortest (in characters) first. Equal lengths keep the order in
/// which the index was first named.
pub struct CommonNeighborRanker<I> {
    index: I,
}

impl<I: NeighborIndex> CommonNeighborRanker<I> {
    /// Minimum number of times a sentence must be named to be ranked.
    pub const MIN_MENTIONS: usize = 2;

    pub fn new(index: I) -> Self {
        Self { index }
    }
}

impl<I: NeighborIndex> Ranker for CommonNeighborRanker<I> {
    fn rank(&mut self, sentences: &[String]) -> Ranking {
        let queries: Vec<String> = sentences
            .iter()
            .filter(|sentence| !sentence.is_empty())
            .cloned()
            .collect();

        // (index, mentions) in first-mention order
        let mut mentions: Vec<(usize, usize)> = Vec::new();
        let mut slots: HashMap<usize, usize> = HashMap::new();
        for closest in self.index.closest(&queries).into_iter().flatten() {
            if closest >= sentences.len() {
                continue;
            }
            let slot = *slots.entry(closest).or_insert_with(|| {
                mentions.push((closest, 0));
                mentions.len() - 1
            });
            mentions[slot].1 += 1;
        }

        let mut repeated: Vec<usize> = mentions
            .into_iter()
            .filter(|&(_, count)| count >= Self::MIN_MENTIONS)
            .map(|(index, _)| index)
            .collect();
        repeated.sort_by_key(|&index| sentences[index].chars().count());
        tracing::debug!(ranked = repeated.len(), "common-neighbor ranking");

        repeated.into_iter().collect()
    }
}
