//! Budgeted, diversity-driven sentence selection for training corpora.
//!
//! `delfy-core` picks a subset of a fully materialized corpus under a budget
//! expressed in sentences or tokens. The central algorithm is multi-round
//! decay log-frequency ("delfy") selection, which favors sentences whose
//! tokens are frequent in the unselected pool but not yet covered by what has
//! already been chosen. Simpler baselines (length, uniform random,
//! length-weighted random, nearest-neighbor counts) plug in through the
//! [`selection::Ranker`] trait and are turned into selections by
//! [`selection::BudgetFiller`].
//!
//! Tokenization and nearest-neighbor search are supplied by the caller. All
//! randomness is seedable, so every strategy is reproducible.

pub mod config;
pub mod output;
pub mod selection;
pub mod types;
