use serde::Serialize;

use super::PredictionResult;

/// Spread at or below which models count as equally uncertain.
pub const SIMILAR_TOLERANCE: f64 = 0.05;

/// Spread above which at least one model is meaningfully more certain.
pub const IMPROVEMENT_THRESHOLD: f64 = 0.2;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntropy {
	pub model_id: String,
	pub entropy: f64,
	pub confidence: f64,
}

/// Side-by-side reading of several models' uncertainty on the same prompt.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropyAnalysis {
	pub all_similar: bool,
	/// Some model is clearly more certain than another. Context sizes are not
	/// compared directly: results carry no context window.
	pub improves_with_context: bool,
	pub summary: String,
	pub entropies: Vec<ModelEntropy>,
}

/// Compares the entropies of predictions made for the same prompt.
pub fn compare_entropies(predictions: &[PredictionResult]) -> EntropyAnalysis {
	let entropies: Vec<ModelEntropy> = predictions
		.iter()
		.map(|p| ModelEntropy {
			model_id: p.model_id.clone(),
			entropy: p.entropy,
			confidence: p.confidence,
		})
		.collect();

	if entropies.is_empty() {
		return EntropyAnalysis {
			all_similar: true,
			improves_with_context: false,
			summary: "No predictions yet.".to_owned(),
			entropies,
		};
	}

	let (min, max) = entropies.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
		(lo.min(e.entropy), hi.max(e.entropy))
	});
	let spread = max - min;

	let all_similar = spread <= SIMILAR_TOLERANCE;
	let improves_with_context = spread > IMPROVEMENT_THRESHOLD;

	let summary = if all_similar {
		"Models look similarly uncertain here (entropy is about the same)."
	} else if improves_with_context {
		"Some models are noticeably more certain here (lower entropy)."
	} else {
		"Models differ a bit, but not dramatically."
	};

	EntropyAnalysis {
		all_similar,
		improves_with_context,
		summary: summary.to_owned(),
		entropies,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn prediction(model_id: &str, entropy: f64) -> PredictionResult {
		PredictionResult {
			model_id: model_id.to_owned(),
			context_tokens: Vec::new(),
			distribution_is_top_k: true,
			distribution: Vec::new(),
			chosen_token: String::new(),
			entropy,
			confidence: 0.5,
		}
	}

	#[test]
	fn nothing_to_compare() {
		let analysis = compare_entropies(&[]);
		assert!(analysis.all_similar);
		assert!(!analysis.improves_with_context);
		assert_eq!(analysis.summary, "No predictions yet.");
	}

	#[test]
	fn close_entropies_are_similar() {
		let analysis = compare_entropies(&[prediction("a", 1.00), prediction("b", 1.04)]);
		assert!(analysis.all_similar);
		assert!(!analysis.improves_with_context);
		assert_eq!(analysis.entropies.len(), 2);
	}

	#[test]
	fn wide_spread_improves() {
		let analysis = compare_entropies(&[prediction("uni", 2.0), prediction("bi", 0.5), prediction("tri", 0.1)]);
		assert!(!analysis.all_similar);
		assert!(analysis.improves_with_context);
		assert!(analysis.summary.starts_with("Some models"));
	}

	#[test]
	fn moderate_spread_is_neither() {
		let analysis = compare_entropies(&[prediction("a", 1.0), prediction("b", 1.1)]);
		assert!(!analysis.all_similar);
		assert!(!analysis.improves_with_context);
		assert_eq!(analysis.summary, "Models differ a bit, but not dramatically.");
	}
}
