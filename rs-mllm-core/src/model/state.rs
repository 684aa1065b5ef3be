use super::distribution::Distribution;

/// Counting state for one history during training.
///
/// A `State` corresponds to a fixed `k`-character history (`key`) and stores
/// how many times each character was observed right after it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - Transitions keep the order in which each character was first observed
/// - Each transition occurrence count is strictly positive
#[derive(Clone, Debug)]
pub(crate) struct State {
	/// The history this state counts transitions for.
	key: String,
	/// Outgoing transitions in first-observation order.
	/// Example: [('e', 42), ('a', 3)]
	transitions: Vec<(char, usize)>,
}

impl State {
	/// Creates a new empty state for the given history.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			transitions: Vec::new(),
		}
	}

	/// Records an occurrence of a transition toward `next_char`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is appended with an initial count of 1.
	pub fn add_transition(&mut self, next_char: char) {
		match self.transitions.iter_mut().find(|(c, _)| *c == next_char) {
			Some((_, occurrence)) => *occurrence += 1,
			None => self.transitions.push((next_char, 1)),
		}
	}

	/// Total number of observations.
	pub fn total(&self) -> usize {
		self.transitions.iter().map(|(_, occurrence)| occurrence).sum()
	}

	/// Turns the counts into a maximum-likelihood distribution.
	///
	/// Each probability is `count / total`, stored in transition order.
	/// Unobserved characters are simply absent.
	pub fn into_distribution(self) -> (String, Distribution) {
		let total = self.total() as f64;
		let entries = self
			.transitions
			.into_iter()
			.map(|(c, occurrence)| (c, occurrence as f64 / total))
			.collect();
		(self.key, Distribution::new(entries))
	}
}
