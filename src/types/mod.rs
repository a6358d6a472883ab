pub mod budget;
pub mod corpus;
pub mod identifiers;
pub mod selection;

pub use budget::{Budget, BudgetUnit};
pub use corpus::TokenizedCorpus;
pub use identifiers::CorpusFingerprint;
pub use selection::{ConfigError, SelectionError, SelectionMetadata, SelectionResult, SelectionSet};
