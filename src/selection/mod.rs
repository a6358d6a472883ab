pub mod allocator;
pub mod budgeting;
pub mod delfy;
pub mod factory;
pub mod frequency;
pub mod neighbors;
pub mod ranking;
pub mod tokenizer;
pub mod weighted;

use std::sync::Arc;

use crate::config::{RankerKind, SelectionPlan, Strategy};
use crate::types::{
	Budget, BudgetUnit, SelectionError, SelectionMetadata, SelectionResult, SelectionSet,
	TokenizedCorpus,
};
pub use allocator::{run_delfy, BudgetAllocator};
pub use budgeting::{fill_sentence_budget, fill_token_budget, BudgetFiller, BudgetResult};
pub use delfy::{DecayLogFrequency, DecayParams, ScoredSentence};
pub use factory::{build_ranker, lookup_ranker, RankerOptions};
pub use frequency::TokenFrequencyTable;
pub use neighbors::{CommonNeighborRanker, NeighborIndex, NeighborRanker, Tiebreaker};
pub use ranking::{LengthRanker, Ranker, Ranking, UniformRandomRanker};
pub use tokenizer::{Tokenizer, WhitespaceTokenizer};
pub use weighted::{SamplingWeights, WeightedRandomRanker};

pub struct CorpusSelector<K> {
	tokenizer: K,
	neighbor_index: Option<Arc<dyn NeighborIndex + Send + Sync>>,
}

impl Default for CorpusSelector<WhitespaceTokenizer> {
	fn default() -> Self {
		Self {
			tokenizer: WhitespaceTokenizer,
			neighbor_index: None,
		}
	}
}

impl<K> CorpusSelector<K>
where
	K: Tokenizer + Clone + 'static,
{
	pub fn new(tokenizer: K) -> Self {
		Self {
			tokenizer,
			neighbor_index: None,
		}
	}

	pub fn with_neighbor_index(mut self, index: Arc<dyn NeighborIndex + Send + Sync>) -> Self {
		self.neighbor_index = Some(index);
		self
	}

	/// Select sentences from `sentences` according to `plan`.
	///
	/// `excluded` indices are replaced by the plan's sentinel sequence before
	/// the delfy budget is computed and before scoring. Ranker-based strategies
	/// do not consult it. The weighted strategy samples directly under either
	/// unit rather than filling from a ranking.
	pub fn select(
		&self,
		sentences: &[String],
		plan: &SelectionPlan,
		excluded: &SelectionSet,
	) -> Result<SelectionResult, SelectionError> {
		if let Some(&index) = excluded.iter().next_back().filter(|&&i| i >= sentences.len()) {
			return Err(SelectionError::ExclusionOutOfRange {
				index,
				corpus_size: sentences.len(),
			});
		}

		// 1. Tokenize once; budgets and token accounting share this view.
		// Delfy budgets are measured on the corpus as scored, sentinels included.
		let mut corpus = TokenizedCorpus::from_text(sentences, &self.tokenizer);
		if plan.strategy == Strategy::Delfy {
			let overwritten = corpus.exclude(excluded, &plan.exclusion_sentinel);
			tracing::debug!(overwritten, "applied exclusion list");
		}
		let budget = Budget::from_percentage(
			plan.budget_percentage,
			plan.unit,
			corpus.len(),
			corpus.total_tokens(),
		)?;

		// 2. Selection Phase
		let selected: SelectionSet = match plan.strategy {
			Strategy::Delfy => {
				BudgetAllocator::new(budget, plan.rounds)?.run(&corpus, DecayParams::default())
			}
			Strategy::Ranked(RankerKind::Weighted) => {
				let lengths: Vec<usize> = (0..corpus.len()).map(|i| corpus.token_len(i)).collect();
				let mut rng = factory::rng_from_seed(plan.seed);
				match plan.unit {
					BudgetUnit::Sentence => {
						weighted::sample_by_sentences(&mut rng, &lengths, budget.amount)
							.into_iter()
							.collect()
					}
					BudgetUnit::Token => {
						weighted::sample_by_tokens(&mut rng, &lengths, budget.amount)
					}
				}
			}
			Strategy::Ranked(kind) => {
				let options = RankerOptions {
					seed: plan.seed,
					tiebreaker: Some(plan.tiebreaker),
					neighbor_index: self.neighbor_index.clone(),
				};
				let mut ranker = build_ranker(kind, plan.unit, &self.tokenizer, &options)?;
				let filler = BudgetFiller::new(self.tokenizer.clone());
				filler
					.fill(&mut ranker, sentences, budget)
					.selected
					.into_iter()
					.collect()
			}
		};

		// 3. Accounting Phase
		let tokens_selected = corpus.tokens_in(&selected);
		tracing::info!(
			strategy = %plan.strategy,
			unit = %plan.unit,
			budget = budget.amount,
			selected = selected.len(),
			tokens = tokens_selected,
			"selection complete"
		);

		let metadata = SelectionMetadata {
			strategy: plan.strategy.to_string(),
			budget_unit: plan.unit,
			budget: budget.amount,
			sentences_considered: sentences.len(),
			sentences_selected: selected.len(),
			tokens_selected,
		};

		Ok(SelectionResult {
			indices: selected.into_iter().collect(),
			selection: metadata,
		})
	}
}
