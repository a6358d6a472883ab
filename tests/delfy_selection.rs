use delfy_core::selection::{run_delfy, DecayLogFrequency, TokenFrequencyTable};
use delfy_core::types::{Budget, BudgetUnit, SelectionSet, TokenizedCorpus};

fn corpus(sentences: &[&[&'static str]]) -> TokenizedCorpus<&'static str> {
    TokenizedCorpus::new(sentences.iter().map(|s| s.to_vec()).collect())
}

fn set(indices: &[usize]) -> SelectionSet {
    indices.iter().copied().collect()
}

fn fixture_1() -> TokenizedCorpus<&'static str> {
    corpus(&[
        &["a", "a", "a", "b", "b"],
        &["b", "c", "a", "a", "b", "a"],
        &["a", "a", "d", "b"],
        &["c", "c", "d", "a", "b", "d"],
        &["a", "a", "e", "a"],
    ])
}

fn fixture_2() -> TokenizedCorpus<&'static str> {
    corpus(&[
        &["a", "a", "a", "a", "a", "a", "a"],
        &["a", "b", "a", "b"],
        &["c", "c", "b", "a"],
        &["d", "a", "d", "c", "b"],
        &["a", "e"],
    ])
}

fn fixture_3() -> TokenizedCorpus<&'static str> {
    corpus(&[
        &["a", "a", "a", "a", "a", "a", "a"],
        &["a", "b", "a", "c"],
        &["c", "c", "b", "a"],
        &["d", "a", "d", "c", "b"],
        &["a", "e"],
    ])
}

fn fixture_4() -> TokenizedCorpus<&'static str> {
    corpus(&[
        &["a", "b", "c", "b", "a", "a"],
        &["b", "d", "c", "a"],
        &["a", "a", "d"],
        &["a", "e", "a", "a", "b"],
        &["a", "b", "c", "d", "e", "a", "a", "a"],
    ])
}

#[test]
fn token_budget_two_rounds() {
    let cases = [
        (fixture_1(), set(&[2, 4])),
        (fixture_2(), set(&[2, 4])),
        (fixture_3(), set(&[2, 4])),
        (fixture_4(), set(&[0, 2])),
    ];
    for (i, (corpus, expected)) in cases.iter().enumerate() {
        let selected = run_delfy(corpus, 0.4, BudgetUnit::Token, 2).unwrap();
        assert_eq!(&selected, expected, "fixture {}", i + 1);
    }
}

#[test]
fn sentence_budget_two_rounds() {
    let cases = [
        (fixture_1(), set(&[0, 3])),
        (fixture_2(), set(&[0, 2])),
        (fixture_3(), set(&[0, 2])),
        (fixture_4(), set(&[0, 2])),
    ];
    for (i, (corpus, expected)) in cases.iter().enumerate() {
        let selected = run_delfy(corpus, 0.4, BudgetUnit::Sentence, 2).unwrap();
        assert_eq!(&selected, expected, "fixture {}", i + 1);
    }
}

#[test]
fn single_round_admission() {
    let corpus = fixture_1();
    let selected = SelectionSet::new();

    let by_sentence = DecayLogFrequency::new(&corpus, &selected, Budget::sentences(1)).run();
    assert_eq!(by_sentence, set(&[0]));

    // Only the two 4-token sentences fit strictly under 5, and only one of them.
    let by_token = DecayLogFrequency::new(&corpus, &selected, Budget::tokens(5)).run();
    assert_eq!(by_token, set(&[2]));
}

#[test]
fn token_admission_is_strict() {
    let corpus = fixture_1();
    let selected = SelectionSet::new();

    // Every sentence has at least 4 tokens; 4 < 4 is false.
    let round = DecayLogFrequency::new(&corpus, &selected, Budget::tokens(4)).run();
    assert!(round.is_empty());
}

#[test]
fn never_reselects_selected_indices() {
    let corpus = fixture_1();
    let selected = set(&[0, 3]);

    let round = DecayLogFrequency::new(&corpus, &selected, Budget::sentences(5)).run();

    assert_eq!(round, set(&[1, 2, 4]));
    assert!(round.is_disjoint(&selected));
}

#[test]
fn scores_cover_only_unselected_sentences_in_descending_delfy_order() {
    let corpus = fixture_2();
    let selected = set(&[1]);

    let scored = DecayLogFrequency::new(&corpus, &selected, Budget::sentences(2)).score();

    let mut indices: Vec<usize> = scored.iter().map(|s| s.index).collect();
    indices.sort();
    assert_eq!(indices, vec![0, 2, 3, 4]);
    assert!(scored.windows(2).all(|w| w[0].delfy >= w[1].delfy));
}

#[test]
fn empty_sentences_score_zero() {
    let corpus = corpus(&[&[], &["a", "b"], &["a"]]);
    let selected = SelectionSet::new();
    let round = DecayLogFrequency::new(&corpus, &selected, Budget::sentences(2));

    assert_eq!(round.lf(0), 0.0);
    assert_eq!(round.delfy(0, &TokenFrequencyTable::new()), 0.0);
    assert!(round.lf(1) > 0.0);

    assert_eq!(round.run(), set(&[1, 2]));

    // An empty sentence costs nothing, so it always fits a token budget.
    let by_token = DecayLogFrequency::new(&corpus, &selected, Budget::tokens(5)).run();
    assert_eq!(by_token, set(&[0, 1, 2]));
}

#[test]
fn all_empty_corpus_selects_without_arithmetic_errors() {
    let corpus: TokenizedCorpus<&str> = corpus(&[&[], &[]]);
    let selected = run_delfy(&corpus, 1.0, BudgetUnit::Sentence, 2).unwrap();
    assert_eq!(selected, set(&[0, 1]));
}

#[test]
fn normalized_frequencies_sum_to_one_over_unselected_vocabulary() {
    let corpus = fixture_1();
    let selected = set(&[4]);
    let round = DecayLogFrequency::new(&corpus, &selected, Budget::sentences(1));

    // "e" only occurs in the selected sentence
    let total: f64 = ["a", "b", "c", "d"]
        .iter()
        .map(|token| round.normalized_frequency(token))
        .sum();
    assert!((total - 1.0).abs() < 1e-12, "sum was {total}");
    assert_eq!(round.log_frequency(&"e"), 0.0);
}

#[test]
fn decay_penalizes_selected_and_uhat_coverage() {
    let corpus = fixture_1();
    let selected = set(&[0]);
    let round = DecayLogFrequency::new(&corpus, &selected, Budget::sentences(1));

    let mut uhat = TokenFrequencyTable::new();
    // "a" occurs three times in the selected sentence
    assert!((round.decay(&"a", &uhat) - (-3.0f64).exp()).abs() < 1e-12);
    assert_eq!(round.decay(&"c", &uhat), 1.0);

    uhat.add_sentence(corpus.sentence(3));
    // "c" occurs twice in sentence 3
    assert!((round.decay(&"c", &uhat) - (-2.0f64).exp()).abs() < 1e-12);
}

#[test]
fn delfy_is_deterministic() {
    let corpus = fixture_4();
    let first = run_delfy(&corpus, 0.6, BudgetUnit::Token, 3).unwrap();
    let second = run_delfy(&corpus, 0.6, BudgetUnit::Token, 3).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rejects_zero_rounds_and_bad_percentages() {
    let corpus = fixture_1();
    assert!(run_delfy(&corpus, 0.4, BudgetUnit::Token, 0).is_err());
    assert!(run_delfy(&corpus, 0.0, BudgetUnit::Token, 2).is_err());
    assert!(run_delfy(&corpus, 1.5, BudgetUnit::Sentence, 2).is_err());
}

#[test]
fn scores_are_bit_for_bit_reproducible() {
    // A wide vocabulary makes the normalizer sum sensitive to summation order.
    let sentences: Vec<Vec<String>> = (0..40)
        .map(|i| (0..12).map(|j| format!("w{}", (i * 7 + j * 13) % 301)).collect())
        .collect();
    let corpus = TokenizedCorpus::new(sentences);
    let selected = set(&[3, 17]);

    let score_bits = || -> Vec<(usize, u64)> {
        DecayLogFrequency::new(&corpus, &selected, Budget::tokens(60))
            .score()
            .iter()
            .map(|s| (s.index, s.delfy.to_bits()))
            .collect()
    };

    let reference = score_bits();
    for _ in 0..20 {
        assert_eq!(score_bits(), reference);
    }
}
