//! Next-token inference over a `LoadedModel`.
//!
//! Inference is a pure function of an immutable model and a prompt: it never
//! fails and never mutates the model. Unknown contexts, empty prompts and
//! degenerate weight rows all degrade to a uniform distribution so there is
//! always something to display.

pub mod context;
pub mod distribution;
pub mod entropy;
pub mod generation;

use log::debug;
use serde::Serialize;

use crate::model::LoadedModel;
use context::{ContextWindow, tokenize_prompt};
use distribution::{TokenProbability, argmax, shannon_entropy, softmax, to_top_k_distribution, uniform_over_vocab};

/// Number of entries returned when no `top_k` is given.
pub const DEFAULT_TOP_K: isize = 10;

/// Knobs of a single inference call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InferOptions {
	/// How many of the most likely tokens to return. Negative means none.
	pub top_k: isize,
	/// Leave out ids that have no vocabulary token.
	pub restrict_to_vocab: bool,
}

impl Default for InferOptions {
	fn default() -> Self {
		Self { top_k: DEFAULT_TOP_K, restrict_to_vocab: true }
	}
}

/// Outcome of one inference call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
	pub model_id: String,
	pub context_tokens: Vec<String>,
	/// The distribution below is truncated to the top-k entries.
	pub distribution_is_top_k: bool,
	/// Sorted by descending probability.
	pub distribution: Vec<TokenProbability>,
	/// Most likely next token, empty when the distribution is empty.
	pub chosen_token: String,
	/// Entropy of the full (untruncated) distribution, in nats.
	pub entropy: f64,
	/// Probability of `chosen_token`, 0 when the distribution is empty.
	pub confidence: f64,
}

/// Resolves the weight row a prompt selects, if any.
pub fn select_state_id(model: &LoadedModel, context_tokens: &[String]) -> Option<usize> {
	let states = model.state_vocab()?;
	ContextWindow::from(model.config().context_window).resolve_state(states, context_tokens)
}

/// Full next-token probability vector for a tokenized context, indexed by token id.
pub fn next_token_probabilities(model: &LoadedModel, context_tokens: &[String]) -> Vec<f64> {
	let row = select_state_id(model, context_tokens).and_then(|id| model.weights().row(id));
	match row {
		Some(logits) => softmax(logits),
		None => {
			debug!(
				"No state for context {:?} in model '{}', using uniform distribution",
				context_tokens,
				model.id()
			);
			uniform_over_vocab(model.vocab())
		}
	}
}

/// Predicts the next token of `prompt`.
pub fn infer_next_token(model: &LoadedModel, prompt: &str, options: InferOptions) -> PredictionResult {
	let context_tokens = tokenize_prompt(prompt);
	let probs = next_token_probabilities(model, &context_tokens);

	let distribution = to_top_k_distribution(model.vocab(), &probs, options.top_k, options.restrict_to_vocab);
	let (chosen_token, confidence) = match argmax(&distribution) {
		Some(best) => (best.token.clone(), best.probability),
		None => (String::new(), 0.0),
	};

	PredictionResult {
		model_id: model.id().to_owned(),
		context_tokens,
		distribution_is_top_k: true,
		entropy: shannon_entropy(&probs),
		distribution,
		chosen_token,
		confidence,
	}
}
