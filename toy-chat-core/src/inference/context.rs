use crate::artifact::StateVocab;

/// State label of unigram models, which have a single context-free row.
pub const NO_CONTEXT_LABEL: &str = "(no context)";

/// Separator between tokens in multi-token state labels (`"the|cat"`).
pub const STATE_SEPARATOR: &str = "|";

/// How many preceding tokens select a weight row.
///
/// Built from the integer `contextWindow` of a model configuration; any value
/// outside `0..=3` maps to `Unsupported` and never resolves to a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextWindow {
	/// No context: every prediction uses the `(no context)` row.
	Unigram,
	/// The last token.
	Bigram,
	/// The last two tokens.
	Trigram,
	/// The last three tokens.
	Quadgram,
	Unsupported(i64),
}

impl From<i64> for ContextWindow {
	fn from(window: i64) -> Self {
		match window {
			0 => Self::Unigram,
			1 => Self::Bigram,
			2 => Self::Trigram,
			3 => Self::Quadgram,
			other => Self::Unsupported(other),
		}
	}
}

impl ContextWindow {
	/// Builds the state label for a tokenized context.
	///
	/// Returns `None` when the context is too short or the window unsupported.
	pub fn state_label(self, tokens: &[String]) -> Option<String> {
		match self {
			Self::Unigram => Some(NO_CONTEXT_LABEL.to_owned()),
			Self::Bigram => tokens.last().cloned(),
			Self::Trigram => last_n_joined(tokens, 2),
			Self::Quadgram => last_n_joined(tokens, 3),
			Self::Unsupported(_) => None,
		}
	}

	/// Resolves a tokenized context to a state id.
	///
	/// A unigram model without a `(no context)` row falls back to state 0.
	/// Every other window yields `None` when its label is unknown.
	pub fn resolve_state(self, states: &StateVocab, tokens: &[String]) -> Option<usize> {
		let label = self.state_label(tokens)?;
		match self {
			Self::Unigram => Some(states.id_of(&label).unwrap_or(0)),
			_ => states.id_of(&label),
		}
	}
}

fn last_n_joined(tokens: &[String], n: usize) -> Option<String> {
	if tokens.len() < n {
		return None;
	}
	Some(tokens[tokens.len() - n..].join(STATE_SEPARATOR))
}

/// Whitespace tokenizer: trims, lowercases, splits on runs of whitespace.
pub fn tokenize_prompt(prompt: &str) -> Vec<String> {
	prompt.trim()
		.to_lowercase()
		.split_whitespace()
		.map(str::to_owned)
		.collect()
}
