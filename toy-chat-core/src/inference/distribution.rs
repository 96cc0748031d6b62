use serde::Serialize;

use crate::artifact::Vocabulary;

/// One entry of a next-token distribution.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProbability {
	pub token: String,
	pub token_id: usize,
	pub probability: f64,
}

/// Softmax over a vector of logits.
///
/// The row maximum is subtracted before exponentiating so large logits cannot
/// overflow. If every exponential underflows to zero the result is uniform.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
	if logits.is_empty() {
		return Vec::new();
	}

	let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
	let exps: Vec<f64> = logits.iter().map(|&v| (v - max).exp()).collect();
	let sum: f64 = exps.iter().sum();

	if sum == 0.0 {
		return uniform_distribution(logits.len());
	}

	exps.into_iter().map(|e| e / sum).collect()
}

/// Shannon entropy (natural log) of a probability vector.
///
/// Zero-probability terms contribute nothing. Empty input gives 0.
pub fn shannon_entropy(probs: &[f64]) -> f64 {
	probs.iter()
		.filter(|&&p| p > 0.0)
		.map(|&p| -p * p.ln())
		.sum()
}

/// `n` equal probabilities of `1/n`; empty for `n == 0`.
pub fn uniform_distribution(n: usize) -> Vec<f64> {
	if n == 0 {
		return Vec::new();
	}
	vec![1.0 / n as f64; n]
}

/// Uniform distribution over the tokens of a vocabulary, indexed by token id.
///
/// The vector is `vocab.len()` long, like a weight row. Ids in that range
/// without a token get probability 0, so this is exactly
/// `uniform_distribution(vocab.len())` when ids are dense.
pub(crate) fn uniform_over_vocab(vocab: &Vocabulary) -> Vec<f64> {
	let width = vocab.len();
	let present = (0..width).filter(|&id| vocab.token_of(id).is_some()).count();
	if present == width {
		return uniform_distribution(width);
	}

	let p = 1.0 / present as f64;
	(0..width)
		.map(|id| if vocab.token_of(id).is_some() { p } else { 0.0 })
		.collect()
}

/// Turns a full probability vector (indexed by token id) into its `top_k`
/// most likely entries, sorted by descending probability.
///
/// The sort is stable: equal probabilities keep ascending id order. Negative
/// `top_k` is treated as 0. With `restrict_to_vocab`, ids that have no token
/// are left out; otherwise they appear with an empty token.
pub fn to_top_k_distribution(
	vocab: &Vocabulary,
	probs: &[f64],
	top_k: isize,
	restrict_to_vocab: bool,
) -> Vec<TokenProbability> {
	let mut items: Vec<TokenProbability> = probs
		.iter()
		.enumerate()
		.filter_map(|(token_id, &probability)| {
			let token = vocab.token_of(token_id);
			if restrict_to_vocab && token.is_none() {
				return None;
			}
			Some(TokenProbability {
				token: token.unwrap_or_default().to_owned(),
				token_id,
				probability,
			})
		})
		.collect();

	items.sort_by(|a, b| b.probability.total_cmp(&a.probability));
	items.truncate(top_k.max(0) as usize);
	items
}

/// Highest-probability entry of a list, which need not be sorted.
///
/// On ties the first entry wins. `None` for an empty list.
pub fn argmax(items: &[TokenProbability]) -> Option<&TokenProbability> {
	let (first, rest) = items.split_first()?;
	Some(rest.iter().fold(first, |best, item| {
		if item.probability > best.probability { item } else { best }
	}))
}
