use std::collections::HashMap;
use std::hash::Hash;

use crate::types::TokenizedCorpus;

/// Token occurrence counts over one partition of a corpus.
///
/// Keys borrow from the corpus, so a table is a cheap per-round snapshot
/// rather than an owned copy of the vocabulary.
#[derive(Debug, Clone)]
pub struct TokenFrequencyTable<'a, T> {
    counts: HashMap<&'a T, usize>,
}

impl<'a, T> Default for TokenFrequencyTable<'a, T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<'a, T> TokenFrequencyTable<'a, T>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every token of every sentence in `indices`.
    pub fn from_indices<I>(corpus: &'a TokenizedCorpus<T>, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut table = Self::new();
        for index in indices {
            table.add_sentence(corpus.sentence(index));
        }
        table
    }

    pub fn add_sentence(&mut self, tokens: &'a [T]) {
        for token in tokens {
            *self.counts.entry(token).or_insert(0) += 1;
        }
    }

    pub fn count(&self, token: &T) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a T, usize)> + '_ {
        self.counts.iter().map(|(&token, &count)| (token, count))
    }
}
