use rand::Rng;

use super::context::tokenize_prompt;
use super::distribution::{argmax, to_top_k_distribution};
use super::next_token_probabilities;
use crate::model::LoadedModel;

/// How `continue_prompt` picks each next token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
	/// Always the most likely token.
	Greedy,
	/// A weighted random draw from the full distribution.
	Sample,
}

/// Draws a token id with probability proportional to its weight.
///
/// Performs an O(n) scan with cumulative subtraction. Returns `None` if no
/// entry is positive.
pub fn sample_token<R: Rng>(probs: &[f64], rng: &mut R) -> Option<usize> {
	let total: f64 = probs.iter().filter(|&&p| p > 0.0).sum();
	if total <= 0.0 {
		return None;
	}

	let mut r = rng.random_range(0.0..total);
	let mut fallback = None;
	for (token_id, &p) in probs.iter().enumerate() {
		if p <= 0.0 {
			continue;
		}
		if r < p {
			return Some(token_id);
		}
		r -= p;
		fallback = Some(token_id);
	}

	// Rounding can leave `r` just above the last bucket
	fallback
}

/// Extends a prompt by up to `steps` tokens, feeding each chosen token back
/// as context.
///
/// Stops early when no token can be chosen. Returns only the generated tokens.
pub fn continue_prompt<R: Rng>(
	model: &LoadedModel,
	prompt: &str,
	steps: usize,
	strategy: Strategy,
	rng: &mut R,
) -> Vec<String> {
	let mut context = tokenize_prompt(prompt);
	let mut generated = Vec::with_capacity(steps);

	for _ in 0..steps {
		let probs = next_token_probabilities(model, &context);
		let next = match strategy {
			Strategy::Greedy => {
				let top = to_top_k_distribution(model.vocab(), &probs, 1, true);
				argmax(&top).map(|best| best.token.clone())
			}
			Strategy::Sample => sample_token(&probs, rng)
				.and_then(|id| model.vocab().token_of(id))
				.map(str::to_owned),
		};

		match next {
			Some(token) if !token.is_empty() => {
				context.push(token.clone());
				generated.push(token);
			}
			_ => break,
		}
	}

	generated
}
