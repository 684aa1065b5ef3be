//! Character-level maximum-likelihood language model.
//!
//! This crate learns, from a text corpus, the empirical distribution of the
//! next character given a fixed-length window of preceding characters, and
//! samples new text from it:
//! - Training (`model::trainer`) counts history -> next character transitions
//! - Generation (`model::generator`) samples one character at a time and
//!   slides the history window forward
//! - The trained `DistributionTable` can be persisted and reloaded
//!
//! No smoothing is applied: characters never seen after a history have
//! probability zero.

/// Distribution table, training and generation.
pub mod model;

/// Corpus reading and model path helpers.
pub mod io;

/// Crate error type.
pub mod error;

pub use error::{ModelError, Result};
pub use model::distribution::Distribution;
pub use model::generator::{generate, Generator};
pub use model::history::{HistoryLength, SENTINEL};
pub use model::table::DistributionTable;
pub use model::trainer::train;
