use std::collections::VecDeque;

use log::info;

use crate::error::{ModelError, Result};
use super::table::DistributionTable;

/// Placeholder used to pad the history before any real character exists.
pub const SENTINEL: char = '~';

/// Returns `length` sentinel characters, the history used at the start of
/// training and generation.
pub fn padding(length: usize) -> String {
	std::iter::repeat_n(SENTINEL, length).collect()
}

/// `true` if `key` is non-empty and made only of sentinel characters.
pub(crate) fn is_padding(key: &str) -> bool {
	!key.is_empty() && key.chars().all(|c| c == SENTINEL)
}

/// Outcome of matching a requested history length against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryLength {
	/// The requested length matches the table.
	Requested(usize),
	/// The table was trained with another length, which is used instead.
	Corrected { requested: usize, actual: usize },
}

impl HistoryLength {
	/// The length generation will actually use.
	pub fn get(&self) -> usize {
		match *self {
			HistoryLength::Requested(length) => length,
			HistoryLength::Corrected { actual, .. } => actual,
		}
	}

	pub fn is_corrected(&self) -> bool {
		matches!(self, HistoryLength::Corrected { .. })
	}
}

/// Recovers the history length a table was trained with.
///
/// Training always starts from the all-sentinel history, so the length of
/// that key is the trained length. Returns `None` when no such key exists
/// (empty table).
pub fn recover_history_length(table: &DistributionTable) -> Option<usize> {
	table
		.iter()
		.map(|(key, _)| key)
		.find(|key| is_padding(key))
		.map(|key| key.chars().count())
}

/// Checks `requested` against the table and falls back to the trained
/// length when they differ.
///
/// # Errors
/// - `InvalidHistoryLength` if `requested` is zero
/// - `Configuration` if the table has no all-sentinel history to recover from
pub fn resolve_history_length(table: &DistributionTable, requested: usize) -> Result<HistoryLength> {
	if requested == 0 {
		return Err(ModelError::InvalidHistoryLength(requested));
	}

	if table.contains(&padding(requested)) {
		return Ok(HistoryLength::Requested(requested));
	}

	match recover_history_length(table) {
		Some(actual) => {
			info!("model was trained with history length {actual}, not {requested}; falling back to {actual}");
			Ok(HistoryLength::Corrected { requested, actual })
		}
		None => Err(ModelError::Configuration(format!(
			"cannot use history length {requested}: the model has no padding history to recover its length from (was it trained on an empty corpus?)"
		))),
	}
}

/// Sliding window over the last `length` generated characters.
///
/// Always holds exactly `length` characters; starts fully padded.
#[derive(Debug, Clone)]
pub(crate) struct History {
	window: VecDeque<char>,
}

impl History {
	pub fn new(length: usize) -> Self {
		Self { window: std::iter::repeat_n(SENTINEL, length).collect() }
	}

	/// Appends `next` and drops the oldest character.
	pub fn push(&mut self, next: char) {
		if self.window.pop_front().is_some() {
			self.window.push_back(next);
		}
	}

	/// The window as a table key.
	pub fn key(&self) -> String {
		self.window.iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::trainer::train;

	#[test]
	fn padding_is_made_of_sentinels() {
		assert_eq!(padding(3), "~~~");
		assert!(is_padding("~~~"));
		assert!(!is_padding("~a~"));
		assert!(!is_padding(""));
	}

	#[test]
	fn history_slides_and_keeps_its_length() {
		let mut history = History::new(3);
		assert_eq!(history.key(), "~~~");

		for c in "abcd".chars() {
			history.push(c);
			assert_eq!(history.key().chars().count(), 3);
		}
		assert_eq!(history.key(), "bcd");
	}

	#[test]
	fn history_handles_multibyte_characters() {
		let mut history = History::new(2);
		history.push('é');
		history.push('ß');
		history.push('漢');
		assert_eq!(history.key(), "ß漢");
	}

	#[test]
	fn matching_length_is_kept() {
		let table = train("hello world", 4).unwrap();
		assert_eq!(resolve_history_length(&table, 4).unwrap(), HistoryLength::Requested(4));
	}

	#[test]
	fn mismatched_length_is_recovered() {
		let table = train("the quick brown fox", 4).unwrap();
		assert_eq!(recover_history_length(&table), Some(4));

		let resolved = resolve_history_length(&table, 2).unwrap();
		assert_eq!(resolved, HistoryLength::Corrected { requested: 2, actual: 4 });
		assert_eq!(resolved.get(), 4);
		assert!(resolved.is_corrected());
	}

	#[test]
	fn sentinels_in_the_corpus_do_not_confuse_recovery() {
		let table = train("~~~a~~", 2).unwrap();
		assert_eq!(recover_history_length(&table), Some(2));
	}

	#[test]
	fn empty_table_cannot_be_resolved() {
		let table = train("", 3).unwrap();
		assert_eq!(recover_history_length(&table), None);

		let err = resolve_history_length(&table, 3).unwrap_err();
		assert!(err.is_configuration());
	}

	#[test]
	fn zero_length_is_rejected() {
		let table = train("abc", 1).unwrap();
		assert!(resolve_history_length(&table, 0).unwrap_err().is_usage());
	}
}
