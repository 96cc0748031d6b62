use std::collections::HashMap;

/// Bidirectional state-label ↔ id mapping.
///
/// A state is one row of the weights matrix: the context a prediction is
/// conditioned on (`"cat"`, `"the|cat"`, `"(no context)"`...).
///
/// # Invariants
/// - Ids are dense and assigned in first-occurrence order
/// - The assignment is a pure function of the label order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateVocab {
	state_to_id: HashMap<String, usize>,
	id_to_state: HashMap<usize, String>,
}

impl StateVocab {
	/// Assigns ids `0, 1, 2...` to labels in the order they first appear.
	///
	/// A repeated label keeps the id it got on its first occurrence.
	pub fn from_labels<I, S>(labels: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut vocab = Self::default();
		for label in labels {
			let label = label.as_ref();
			if vocab.state_to_id.contains_key(label) {
				continue;
			}
			let id = vocab.state_to_id.len();
			vocab.state_to_id.insert(label.to_owned(), id);
			vocab.id_to_state.insert(id, label.to_owned());
		}
		vocab
	}

	pub fn id_of(&self, label: &str) -> Option<usize> {
		self.state_to_id.get(label).copied()
	}

	pub fn label_of(&self, id: usize) -> Option<&str> {
		self.id_to_state.get(&id).map(String::as_str)
	}

	/// Number of distinct states.
	pub fn len(&self) -> usize {
		self.id_to_state.len()
	}

	pub fn is_empty(&self) -> bool {
		self.id_to_state.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_follow_first_occurrence() {
		let vocab = StateVocab::from_labels(["b", "a", "b", "c", "a"]);
		assert_eq!(vocab.len(), 3);
		assert_eq!(vocab.id_of("b"), Some(0));
		assert_eq!(vocab.id_of("a"), Some(1));
		assert_eq!(vocab.id_of("c"), Some(2));
		assert_eq!(vocab.label_of(2), Some("c"));
		assert_eq!(vocab.label_of(3), None);
	}

	#[test]
	fn same_order_gives_same_vocab() {
		let labels = ["the|cat", "cat|sat", "the|cat"];
		assert_eq!(StateVocab::from_labels(labels), StateVocab::from_labels(labels));
	}

	#[test]
	fn no_labels_means_no_states() {
		let vocab = StateVocab::from_labels(Vec::<String>::new());
		assert!(vocab.is_empty());
	}
}
