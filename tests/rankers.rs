use std::collections::HashMap;
use std::sync::Arc;

use delfy_core::selection::{
    lookup_ranker, CommonNeighborRanker, LengthRanker, NeighborIndex, NeighborRanker, Ranker,
    RankerOptions, Tiebreaker, UniformRandomRanker, WeightedRandomRanker, WhitespaceTokenizer,
};
use delfy_core::types::{BudgetUnit, ConfigError};

fn sentences(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn meat_sentences() -> Vec<String> {
    sentences(&[
        "My favorite meat is hot dog, by the way.",
        "That is my favorite meat.",
        "My second favorite meat is hamburger.",
        "And, everyone says, oh, don't you prefer steak?",
        "It's like, I know steaks are great, but I like hot dog best, \
         and I like hamburger next best.",
    ])
}

/// Looks neighbors up by sentence text.
struct FakeNeighbors(HashMap<String, usize>);

impl FakeNeighbors {
    fn new(corpus: &[String], closest: &[(usize, usize)]) -> Self {
        Self(
            closest
                .iter()
                .map(|&(query, neighbor)| (corpus[query].clone(), neighbor))
                .collect(),
        )
    }
}

impl NeighborIndex for FakeNeighbors {
    fn closest(&self, sentences: &[String]) -> Vec<Option<usize>> {
        sentences.iter().map(|s| self.0.get(s).copied()).collect()
    }
}

#[test]
fn length_ranker_orders_longest_first() {
    let mut ranker = LengthRanker::new(WhitespaceTokenizer);
    let ranking: Vec<usize> = ranker.rank(&meat_sentences()).collect();
    assert_eq!(ranking, vec![4, 0, 3, 2, 1]);
}

#[test]
fn length_ranker_keeps_corpus_order_on_ties() {
    let mut ranker = LengthRanker::new(WhitespaceTokenizer);
    let ranking: Vec<usize> = ranker
        .rank(&sentences(&["b b", "a a a", "c c", "", "d d"]))
        .collect();
    assert_eq!(ranking, vec![1, 0, 2, 4, 3]);
}

#[test]
fn length_ranker_uses_supplied_tokenizer() {
    let chars = |s: &str| s.chars().map(|c| c.to_string()).collect::<Vec<_>>();
    let mut ranker = LengthRanker::new(chars);
    let ranking: Vec<usize> = ranker.rank(&sentences(&["a b", "abcd"])).collect();
    assert_eq!(ranking, vec![1, 0]);
}

#[test]
fn uniform_ranker_is_a_permutation() {
    let corpus: Vec<String> = (0..50).map(|i| format!("sentence {i}")).collect();
    let mut ranker = UniformRandomRanker::seeded(11);

    let mut ranking: Vec<usize> = ranker.rank(&corpus).collect();
    ranking.sort();
    assert_eq!(ranking, (0..50).collect::<Vec<_>>());
}

#[test]
fn uniform_ranker_reseeds_reproducibly_and_varies_per_call() {
    let corpus: Vec<String> = (0..50).map(|i| format!("sentence {i}")).collect();

    let mut a = UniformRandomRanker::seeded(3);
    let mut b = UniformRandomRanker::seeded(3);
    let first_a: Vec<usize> = a.rank(&corpus).collect();
    let first_b: Vec<usize> = b.rank(&corpus).collect();
    assert_eq!(first_a, first_b);

    let second_a: Vec<usize> = a.rank(&corpus).collect();
    assert_ne!(first_a, second_a, "each call should draw a fresh permutation");
}

#[test]
fn ranking_is_one_shot() {
    let mut ranker = LengthRanker::new(WhitespaceTokenizer);
    let mut ranking = ranker.rank(&meat_sentences());
    assert_eq!(ranking.len(), 5);
    assert_eq!(ranking.by_ref().count(), 5);
    assert_eq!(ranking.next(), None);
}

#[test]
fn neighbor_ranker_orders_by_hit_count_then_length() {
    let corpus = meat_sentences();
    let index = FakeNeighbors::new(&corpus, &[(0, 4), (1, 0), (2, 4), (3, 2), (4, 0)]);
    let mut ranker = NeighborRanker::new(index, Tiebreaker::Length);

    let ranking: Vec<usize> = ranker.rank(&corpus).collect();
    // 4 and 0 have two hits each, 4 is longer; 1 and 3 have none
    assert_eq!(ranking, vec![4, 0, 2]);
}

#[test]
fn neighbor_ranker_random_tiebreak_keeps_count_order() {
    let corpus = meat_sentences();
    let index = FakeNeighbors::new(&corpus, &[(0, 4), (1, 0), (2, 4), (3, 2), (4, 0)]);
    let mut ranker = NeighborRanker::seeded(index, Tiebreaker::Random, 5);

    let ranking: Vec<usize> = ranker.rank(&corpus).collect();
    assert_eq!(ranking.len(), 3);
    let mut top: Vec<usize> = ranking[..2].to_vec();
    top.sort();
    assert_eq!(top, vec![0, 4]);
    assert_eq!(ranking[2], 2);
}

#[test]
fn neighbor_ranker_skips_empty_sentences() {
    let mut corpus = meat_sentences();
    corpus.push(String::new());
    let mut map = FakeNeighbors::new(&corpus, &[(0, 1), (2, 1)]);
    // the empty sentence would point at 3 if it were queried
    map.0.insert(String::new(), 3);

    let counts = NeighborRanker::new(map, Tiebreaker::Length).neighbor_counts(&corpus);
    assert_eq!(counts.into_iter().collect::<Vec<_>>(), vec![(1, 2)]);
}

#[test]
fn common_neighbor_ranker_keeps_repeats_shortest_first() {
    let corpus = meat_sentences();
    // 4 and 2 are each named twice, 1 once. Sentence 2 has 37 characters.
    let index = FakeNeighbors::new(&corpus, &[(0, 4), (1, 2), (2, 4), (3, 2), (4, 1)]);
    let mut ranker = CommonNeighborRanker::new(index);

    let ranking: Vec<usize> = ranker.rank(&corpus).collect();
    assert_eq!(ranking, vec![2, 4]);
}

#[test]
fn common_neighbor_ranker_ties_keep_first_mention_order() {
    let corpus = sentences(&["aa", "bb", "c", "d", "e", ""]);
    // 1 is named first, then 0; both twice and both two characters long.
    let mut index = FakeNeighbors::new(&corpus, &[(0, 1), (1, 0), (2, 1), (3, 0), (4, 4)]);
    // Would give 4 a second mention if empty sentences were queried.
    index.0.insert(String::new(), 4);
    let mut ranker = CommonNeighborRanker::new(index);

    let ranking: Vec<usize> = ranker.rank(&corpus).collect();
    assert_eq!(ranking, vec![1, 0]);
}

#[test]
fn weighted_ranker_prefix_is_not_index_biased() {
    let corpus: Vec<String> = (0..1000).map(|_| "same length".to_string()).collect();
    let mut ranker = WeightedRandomRanker::seeded(5);

    let ranking: Vec<usize> = ranker.rank(&corpus).collect();
    let mut sorted = ranking.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..1000).collect::<Vec<_>>());

    let prefix = &ranking[..100];
    assert!(prefix.iter().any(|&i| i >= 500));
    assert!(prefix.iter().any(|&i| i >= 900));
}

#[test]
fn weighted_ranker_front_follows_length() {
    let corpus = sentences(&["a", "b c d e f g h i j"]);
    let mut ranker = WeightedRandomRanker::seeded(8);

    let long_first = (0..500)
        .filter(|_| ranker.rank(&corpus).next() == Some(1))
        .count();
    // Expected 450 of 500
    assert!(long_first > 400, "{long_first}");
}

#[test]
fn tiebreaker_defaults_follow_budget_unit() {
    assert_eq!(Tiebreaker::default_for(BudgetUnit::Sentence), Tiebreaker::Length);
    assert_eq!(Tiebreaker::default_for(BudgetUnit::Token), Tiebreaker::Random);
    assert_eq!("length".parse::<Tiebreaker>(), Ok(Tiebreaker::Length));
    assert_eq!(
        "coin".parse::<Tiebreaker>(),
        Err(ConfigError::UnknownTiebreaker("coin".to_string()))
    );
}

#[test]
fn factory_builds_rankers_by_name() {
    let corpus = meat_sentences();
    let options = RankerOptions {
        seed: Some(1),
        ..RankerOptions::default()
    };

    let mut length = lookup_ranker("length", BudgetUnit::Sentence, &WhitespaceTokenizer, &options)
        .ok()
        .unwrap();
    assert_eq!(length.rank(&corpus).collect::<Vec<_>>(), vec![4, 0, 3, 2, 1]);

    for name in ["random", "weighted"] {
        let mut ranker = lookup_ranker(name, BudgetUnit::Token, &WhitespaceTokenizer, &options)
            .ok()
            .unwrap();
        let mut ranking: Vec<usize> = ranker.rank(&corpus).collect();
        ranking.sort();
        assert_eq!(ranking, vec![0, 1, 2, 3, 4], "{name}");
    }
}

#[test]
fn factory_rejects_unknown_names_and_missing_index() {
    let options = RankerOptions::default();

    let unknown = lookup_ranker("simcse", BudgetUnit::Sentence, &WhitespaceTokenizer, &options);
    assert!(matches!(unknown, Err(ConfigError::UnknownRanker(name)) if name == "simcse"));

    for name in ["neighbors", "common-neighbors"] {
        let missing = lookup_ranker(name, BudgetUnit::Sentence, &WhitespaceTokenizer, &options);
        assert!(matches!(missing, Err(ConfigError::MissingNeighborIndex)), "{name}");
    }

    let corpus = meat_sentences();
    let with_index = RankerOptions {
        neighbor_index: Some(Arc::new(FakeNeighbors::new(&corpus, &[(1, 3)]))),
        ..RankerOptions::default()
    };
    let mut ranker =
        lookup_ranker("neighbors", BudgetUnit::Sentence, &WhitespaceTokenizer, &with_index)
            .ok()
            .unwrap();
    assert_eq!(ranker.rank(&corpus).collect::<Vec<_>>(), vec![3]);
}
