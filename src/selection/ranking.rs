use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::selection::tokenizer::{Tokenizer, WhitespaceTokenizer};

/// An ordered sequence of original sentence indices, highest priority first.
///
/// A ranking is consumed once; ask the ranker again for a fresh one.
#[derive(Debug)]
pub struct Ranking {
    order: std::vec::IntoIter<usize>,
}

impl Ranking {
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order: order.into_iter(),
        }
    }
}

impl Iterator for Ranking {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.order.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl ExactSizeIterator for Ranking {}

impl FromIterator<usize> for Ranking {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Orders candidate sentences by priority.
///
/// A ranking may be partial: a ranker is free to leave out sentences it
/// considers unfit. Implementations must only emit indices in
/// `0..sentences.len()` and must not emit an index twice.
pub trait Ranker {
    fn rank(&mut self, sentences: &[String]) -> Ranking;
}

impl<R: Ranker + ?Sized> Ranker for Box<R> {
    fn rank(&mut self, sentences: &[String]) -> Ranking {
        (**self).rank(sentences)
    }
}

/// Longest sentences first. Equal lengths keep corpus order.
#[derive(Debug, Default, Clone)]
pub struct LengthRanker<K = WhitespaceTokenizer> {
    tokenizer: K,
}

impl<K: Tokenizer> LengthRanker<K> {
    pub fn new(tokenizer: K) -> Self {
        Self { tokenizer }
    }
}

impl<K: Tokenizer> Ranker for LengthRanker<K> {
    fn rank(&mut self, sentences: &[String]) -> Ranking {
        let mut lengths: Vec<(usize, usize)> = sentences
            .iter()
            .map(|sentence| self.tokenizer.count_tokens(sentence))
            .enumerate()
            .collect();
        lengths.sort_by(|a, b| b.1.cmp(&a.1));
        lengths.into_iter().map(|(index, _)| index).collect()
    }
}

/// A fresh uniform permutation of all indices on every call.
#[derive(Debug, Clone)]
pub struct UniformRandomRanker {
    rng: ChaCha8Rng,
}

impl UniformRandomRanker {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformRandomRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ranker for UniformRandomRanker {
    fn rank(&mut self, sentences: &[String]) -> Ranking {
        let mut order: Vec<usize> = (0..sentences.len()).collect();
        order.shuffle(&mut self.rng);
        Ranking::new(order)
    }
}
