//! Error type shared by training, generation and persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Everything that can go wrong while training, persisting or sampling a model.
#[derive(Error, Debug)]
pub enum ModelError {
	/// History length must be at least 1
	#[error("history length must be a positive integer, got {0}")]
	InvalidHistoryLength(usize),

	/// A history was never observed during training
	#[error("history {0:?} was never observed during training")]
	UnknownHistory(String),

	/// The model cannot be used with the given parameters
	#[error("configuration error: {0}")]
	Configuration(String),

	/// A persisted distribution has no entries
	#[error("history {0:?} has an empty distribution")]
	EmptyDistribution(String),

	/// A persisted distribution breaks the probability rules
	#[error("history {history:?} has an invalid distribution: {reason}")]
	InvalidProbability { history: String, reason: String },

	/// I/O error with file context
	#[error("I/O error for {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Binary (de)serialization error
	#[error("model serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}

impl ModelError {
	/// Wraps an `io::Error` with the path it happened on.
	pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}

	/// Invalid parameter supplied by the caller.
	pub fn is_usage(&self) -> bool {
		matches!(self, Self::InvalidHistoryLength(_))
	}

	/// A history lookup failed during generation.
	pub fn is_lookup(&self) -> bool {
		matches!(self, Self::UnknownHistory(_))
	}

	/// The model and the request cannot be reconciled.
	pub fn is_configuration(&self) -> bool {
		matches!(self, Self::Configuration(_))
	}
}
