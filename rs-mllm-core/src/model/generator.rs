use rand::Rng;
use rand::rngs::ThreadRng;

use crate::error::{ModelError, Result};
use super::history::{resolve_history_length, History, HistoryLength};
use super::table::DistributionTable;

/// Samples text from a trained `DistributionTable`.
///
/// # Responsibilities
/// - Resolve the history length against the table (falling back to the
///   trained length on mismatch)
/// - Draw the next character for a given history
/// - Generate text by sliding the history window over sampled characters
///
/// The table is only borrowed: any number of generators may sample from
/// the same table at once.
#[derive(Debug)]
pub struct Generator<'a, R = ThreadRng> {
	table: &'a DistributionTable,
	history_length: HistoryLength,
	rng: R,
}

impl<'a> Generator<'a, ThreadRng> {
	/// Creates a generator drawing from the thread-local random source.
	///
	/// # Errors
	/// See [`Generator::with_rng`].
	pub fn new(table: &'a DistributionTable, history_length: usize) -> Result<Self> {
		Self::with_rng(table, history_length, rand::rng())
	}
}

impl<'a, R: Rng> Generator<'a, R> {
	/// Creates a generator drawing from `rng`.
	///
	/// If the table has no all-sentinel history of `history_length`
	/// characters, the trained length is recovered from the table and used
	/// instead; `history_length()` reports the correction.
	///
	/// # Errors
	/// - `InvalidHistoryLength` if `history_length` is zero
	/// - `Configuration` if the table is empty or its length cannot be recovered
	pub fn with_rng(table: &'a DistributionTable, history_length: usize, rng: R) -> Result<Self> {
		let history_length = resolve_history_length(table, history_length)?;
		Ok(Self { table, history_length, rng })
	}

	/// History length in use, and whether it was corrected.
	pub fn history_length(&self) -> HistoryLength {
		self.history_length
	}

	/// Samples the character following `history`.
	///
	/// # Errors
	/// - `Configuration` if `history` does not have the table's length
	/// - `UnknownHistory` if `history` was never observed during training
	pub fn sample_next(&mut self, history: &str) -> Result<char> {
		let expected = self.history_length.get();
		let length = history.chars().count();
		if length != expected {
			return Err(ModelError::Configuration(format!(
				"history {history:?} has length {length}, expected {expected}"
			)));
		}

		let distribution = self
			.table
			.get(history)
			.ok_or_else(|| ModelError::UnknownHistory(history.to_owned()))?;

		let r: f64 = self.rng.random();
		distribution
			.sample(r)
			.ok_or_else(|| ModelError::EmptyDistribution(history.to_owned()))
	}

	/// Generates exactly `length` characters, starting from the padding
	/// history.
	///
	/// The padding itself is not part of the output.
	///
	/// # Errors
	/// Returns `UnknownHistory` if generation drifts into a history that was
	/// never observed (e.g. the corpus end).
	pub fn generate(&mut self, length: usize) -> Result<String> {
		let mut history = History::new(self.history_length.get());
		let mut text = String::with_capacity(length);

		for _ in 0..length {
			let next_char = self.sample_next(&history.key())?;
			text.push(next_char);
			history.push(next_char);
		}

		Ok(text)
	}
}

/// Generates `length` characters from `table` with the thread-local random
/// source.
pub fn generate(table: &DistributionTable, history_length: usize, length: usize) -> Result<String> {
	Generator::new(table, history_length)?.generate(length)
}
