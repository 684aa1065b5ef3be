use std::collections::HashMap;

use log::info;

use crate::error::{ModelError, Result};
use super::history::SENTINEL;
use super::state::State;
use super::table::DistributionTable;

/// Trains a character model on `corpus` with histories of `history_length`
/// characters.
///
/// # Behavior
/// - Prepends `history_length` sentinel characters to the corpus.
/// - Slides a window of `history_length + 1` characters over the padded text:
///   the first `history_length` form the history, the last one is the
///   observed next character.
/// - Converts the counts of each history into maximum-likelihood
///   probabilities (no smoothing).
///
/// Histories and their characters keep first-observation order, so training
/// the same corpus twice yields identical tables. An empty corpus yields an
/// empty table.
///
/// # Errors
/// Returns `InvalidHistoryLength` if `history_length` is zero.
pub fn train(corpus: &str, history_length: usize) -> Result<DistributionTable> {
	if history_length == 0 {
		return Err(ModelError::InvalidHistoryLength(history_length));
	}

	let text: Vec<char> = std::iter::repeat_n(SENTINEL, history_length)
		.chain(corpus.chars())
		.collect();
	info!("Training on {} characters with history length {}", text.len() - history_length, history_length);

	let mut states: Vec<State> = Vec::new();
	let mut index: HashMap<String, usize> = HashMap::new();

	// For each (history, next character) pair in the padded text
	for window in text.windows(history_length + 1) {
		let key: String = window[..history_length].iter().collect();
		let next_char = window[history_length];

		let position = *index.entry(key).or_insert_with_key(|key| {
			states.push(State::new(key));
			states.len() - 1
		});
		states[position].add_transition(next_char);
	}

	let table = DistributionTable::from_entries(
		states.into_iter().map(State::into_distribution).collect(),
	)?;
	info!("Trained {} histories", table.len());
	Ok(table)
}
