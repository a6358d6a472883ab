use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::RankerKind;
use crate::selection::neighbors::{CommonNeighborRanker, NeighborIndex, NeighborRanker, Tiebreaker};
use crate::selection::ranking::{LengthRanker, Ranker, UniformRandomRanker};
use crate::selection::tokenizer::Tokenizer;
use crate::selection::weighted::WeightedRandomRanker;
use crate::types::{BudgetUnit, ConfigError};

/// Everything a ranker may need beyond its kind and the budget unit.
#[derive(Clone, Default)]
pub struct RankerOptions {
    pub seed: Option<u64>,
    /// Defaults to [`Tiebreaker::default_for`] the budget unit.
    pub tiebreaker: Option<Tiebreaker>,
    pub neighbor_index: Option<Arc<dyn NeighborIndex + Send + Sync>>,
}

impl RankerOptions {
    fn rng(&self) -> ChaCha8Rng {
        rng_from_seed(self.seed)
    }

    fn neighbor_index(&self) -> Result<Arc<dyn NeighborIndex + Send + Sync>, ConfigError> {
        self.neighbor_index
            .clone()
            .ok_or(ConfigError::MissingNeighborIndex)
    }
}

/// Seeded generator when a seed is given, OS entropy otherwise.
pub(crate) fn rng_from_seed(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Build a ranker by name, e.g. `"length"` or `"weighted"`.
pub fn lookup_ranker<K>(
    name: &str,
    unit: BudgetUnit,
    tokenizer: &K,
    options: &RankerOptions,
) -> Result<Box<dyn Ranker>, ConfigError>
where
    K: Tokenizer + Clone + 'static,
{
    build_ranker(name.parse()?, unit, tokenizer, options)
}

pub fn build_ranker<K>(
    kind: RankerKind,
    unit: BudgetUnit,
    tokenizer: &K,
    options: &RankerOptions,
) -> Result<Box<dyn Ranker>, ConfigError>
where
    K: Tokenizer + Clone + 'static,
{
    let ranker: Box<dyn Ranker> = match kind {
        RankerKind::Length => Box::new(LengthRanker::new(tokenizer.clone())),
        RankerKind::Random => Box::new(match options.seed {
            Some(seed) => UniformRandomRanker::seeded(seed),
            None => UniformRandomRanker::new(),
        }),
        RankerKind::Weighted => Box::new(WeightedRandomRanker::with_tokenizer(
            tokenizer.clone(),
            options.rng(),
        )),
        RankerKind::Neighbors => {
            let index = options.neighbor_index()?;
            let tiebreaker = options
                .tiebreaker
                .unwrap_or_else(|| Tiebreaker::default_for(unit));
            Box::new(NeighborRanker::with_tokenizer(
                index,
                tiebreaker,
                tokenizer.clone(),
                options.rng(),
            ))
        }
        RankerKind::CommonNeighbors => {
            Box::new(CommonNeighborRanker::new(options.neighbor_index()?))
        }
    };
    Ok(ranker)
}
