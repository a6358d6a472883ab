use std::collections::BTreeSet;
use std::hash::Hash;

use crate::selection::tokenizer::Tokenizer;

/// An in-memory corpus of tokenized sentences.
///
/// Sentence indices are positions in the original corpus and stay stable for
/// the lifetime of the value. Tokens are opaque: anything hashable works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedCorpus<T> {
    sentences: Vec<Vec<T>>,
}

impl<T> TokenizedCorpus<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new(sentences: Vec<Vec<T>>) -> Self {
        Self { sentences }
    }

    /// Overwrite the token sequence of every excluded index with `sentinel`.
    ///
    /// Indices past the end of the corpus are ignored. Returns the number of
    /// sentences that were overwritten.
    pub fn exclude(&mut self, excluded: &BTreeSet<usize>, sentinel: &[T]) -> usize {
        let mut overwritten = 0;
        for &index in excluded {
            if let Some(sentence) = self.sentences.get_mut(index) {
                *sentence = sentinel.to_vec();
                overwritten += 1;
            }
        }
        overwritten
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentence(&self, index: usize) -> &[T] {
        &self.sentences[index]
    }

    pub fn token_len(&self, index: usize) -> usize {
        self.sentences[index].len()
    }

    pub fn total_tokens(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    /// Token count of a subset of the corpus.
    pub fn tokens_in<'a, I>(&self, indices: I) -> usize
    where
        I: IntoIterator<Item = &'a usize>,
    {
        indices.into_iter().map(|&i| self.token_len(i)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T]> {
        self.sentences.iter().map(Vec::as_slice)
    }
}

impl TokenizedCorpus<String> {
    pub fn from_text<K: Tokenizer + ?Sized>(sentences: &[String], tokenizer: &K) -> Self {
        Self::new(sentences.iter().map(|s| tokenizer.tokenize(s)).collect())
    }
}
