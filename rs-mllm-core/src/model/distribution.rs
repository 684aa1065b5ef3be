use serde::{Deserialize, Serialize};

/// Discrete probability distribution over the character following a history.
///
/// Entries are kept in the order they were first observed during training.
/// That order is part of the model: sampling walks it as-is, so it decides
/// which character wins when a draw lands on a bucket boundary.
///
/// # Invariants
/// - At least one entry
/// - Probabilities are positive and sum to 1.0 (within rounding)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Distribution {
	entries: Vec<(char, f64)>,
}

impl Distribution {
	pub(crate) fn new(entries: Vec<(char, f64)>) -> Self {
		Self { entries }
	}

	/// `(character, probability)` pairs in stored order.
	pub fn entries(&self) -> &[(char, f64)] {
		&self.entries
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Probability of `c`, zero if it was never observed.
	#[cfg(test)]
	pub(crate) fn probability(&self, c: char) -> f64 {
		self.entries
			.iter()
			.find(|(candidate, _)| *candidate == c)
			.map_or(0.0, |(_, p)| *p)
	}

	/// Sum of all probabilities.
	pub(crate) fn total(&self) -> f64 {
		self.entries.iter().map(|(_, p)| p).sum()
	}

	/// Picks a character from a uniform draw `r` in `[0, 1)`.
	///
	/// Inverse-CDF sampling over the stored order: `r` is reduced by each
	/// probability in turn and the first character bringing it to zero or
	/// below is returned. If rounding leaves `r` positive after the last
	/// entry, the last character is returned.
	///
	/// Returns `None` only for an empty distribution.
	pub fn sample(&self, mut r: f64) -> Option<char> {
		for (c, probability) in &self.entries {
			r -= probability;
			if r <= 0.0 {
				return Some(*c);
			}
		}

		self.entries.last().map(|(c, _)| *c)
	}
}
