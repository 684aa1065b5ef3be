use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::error::{ModelError, Result};
use super::distribution::Distribution;
use super::history::recover_history_length;

/// Trained model: each observed history mapped to the distribution of the
/// character that followed it.
///
/// Histories keep their first-observation order from training, and that
/// order survives persistence.
///
/// # Invariants
/// - Every key has the same length `k` (in characters)
/// - Every distribution is non-empty, with finite non-negative
///   probabilities summing to 1.0
/// - Only histories observed during training are present
///
/// The table is never mutated once built; it can be shared freely between
/// generators.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistributionTable {
	entries: Vec<(String, Distribution)>,
	index: HashMap<String, usize>,
}

impl DistributionTable {
	/// Builds a table from ordered entries, checking its invariants.
	///
	/// # Errors
	/// - `EmptyDistribution` if a history has no entries
	/// - `InvalidProbability` if a probability is negative or not finite, or
	///   a history's probabilities do not sum to 1.0
	/// - `Configuration` if keys differ in length or a key is repeated
	pub fn from_entries(entries: Vec<(String, Distribution)>) -> Result<Self> {
		let mut index = HashMap::with_capacity(entries.len());
		let mut key_length = None;

		for (position, (key, distribution)) in entries.iter().enumerate() {
			if distribution.is_empty() {
				return Err(ModelError::EmptyDistribution(key.clone()));
			}
			check_probabilities(key, distribution)?;

			let length = key.chars().count();
			match key_length {
				None => key_length = Some(length),
				Some(expected) if expected != length => {
					return Err(ModelError::Configuration(format!(
						"history {key:?} has length {length}, expected {expected}"
					)));
				}
				Some(_) => (),
			}

			if index.insert(key.clone(), position).is_some() {
				return Err(ModelError::Configuration(format!("history {key:?} appears twice")));
			}
		}

		Ok(Self { entries, index })
	}

	pub fn get(&self, history: &str) -> Option<&Distribution> {
		self.index.get(history).map(|&position| &self.entries[position].1)
	}

	pub fn contains(&self, history: &str) -> bool {
		self.index.contains_key(history)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Histories and their distributions, in training order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Distribution)> {
		self.entries.iter().map(|(key, distribution)| (key.as_str(), distribution))
	}

	/// History length the table was trained with, if it can be inferred.
	pub fn history_length(&self) -> Option<usize> {
		recover_history_length(self)
	}

	/// Serializes the table with `postcard`.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(&self.entries)?)
	}

	/// Deserializes a table produced by `to_bytes`, re-checking its invariants.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let entries: Vec<(String, Distribution)> = postcard::from_bytes(bytes)?;
		Self::from_entries(entries)
	}

	/// Writes the table to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let bytes = self.to_bytes()?;
		std::fs::write(path, &bytes).map_err(|e| ModelError::io(path, e))?;
		debug!("wrote {} histories ({} bytes) to {}", self.len(), bytes.len(), path.display());
		Ok(())
	}

	/// Reads a table previously written by `save`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = std::fs::read(path).map_err(|e| ModelError::io(path, e))?;
		let table = Self::from_bytes(&bytes)?;
		debug!("loaded {} histories ({} bytes) from {}", table.len(), bytes.len(), path.display());
		Ok(table)
	}
}

/// Maximum distance from 1.0 allowed for the sum of a history's probabilities.
const TOTAL_TOLERANCE: f64 = 1e-9;

fn check_probabilities(key: &str, distribution: &Distribution) -> Result<()> {
	let invalid = |reason: String| ModelError::InvalidProbability { history: key.to_owned(), reason };

	if let Some((c, p)) = distribution.entries().iter().find(|(_, p)| !p.is_finite() || *p < 0.0) {
		return Err(invalid(format!("{c:?} has probability {p}")));
	}

	let total = distribution.total();
	if (total - 1.0).abs() > TOTAL_TOLERANCE {
		return Err(invalid(format!("probabilities sum to {total}")));
	}
	Ok(())
}
