use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-model artifact path overrides.
///
/// Use this when a model repository stores its layout somewhere else, or has
/// none at all.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactOverrides {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub layout_path: Option<String>,
}

/// Identity and provenance of one published model, as listed in the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
	pub id: String,
	#[serde(default)]
	pub corpus: String,
	#[serde(default)]
	pub architecture: String,
	/// Number of preceding tokens that select a state (0 to 3).
	pub context_window: i64,
	/// Remote repository, e.g. `"toy-gpt/train-100-unigram-animals"`.
	pub repo: String,
	pub branch: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub artifacts: Option<ArtifactOverrides>,
}

impl ModelConfig {
	/// Returns the layout override, ignoring a blank one.
	pub fn layout_override(&self) -> Option<&str> {
		self.artifacts
			.as_ref()
			.and_then(|a| a.layout_path.as_deref())
			.filter(|path| !path.trim().is_empty())
	}
}

/// Shared artifact paths, relative to a model repository root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDefaults {
	pub meta_path: String,
	pub vocab_path: String,
	pub weights_path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub layout_path: Option<String>,
}

impl Default for ArtifactDefaults {
	fn default() -> Self {
		Self {
			meta_path: "artifacts/00_meta.json".to_owned(),
			vocab_path: "artifacts/01_vocabulary.csv".to_owned(),
			weights_path: "artifacts/02_model_weights.csv".to_owned(),
			layout_path: Some("artifacts/03_token_embeddings.csv".to_owned()),
		}
	}
}

/// The `artifacts` section of a meta descriptor: bare filenames, not paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactIndex {
	#[serde(rename = "00_meta.json")]
	pub meta: String,
	#[serde(rename = "01_vocabulary.csv")]
	pub vocabulary: String,
	#[serde(rename = "02_model_weights.csv")]
	pub weights: String,
	#[serde(rename = "03_token_embeddings.csv", default, skip_serializing_if = "Option::is_none")]
	pub token_embeddings: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusMeta {
	pub description: String,
	pub filename: String,
	pub num_chars: u64,
	pub num_lines: u64,
	/// Path inside the training repository; may be Windows-style.
	pub path: String,
	pub sha256: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingMeta {
	pub epoch_definition: String,
	pub epochs: f64,
	pub learning_rate: f64,
}

/// Descriptor published next to a model's artifacts (`00_meta.json`).
///
/// Externally authored and read-only. Only `artifacts` is required; the
/// descriptive members default to empty values when absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
	pub artifacts: ArtifactIndex,
	#[serde(default)]
	pub concepts: HashMap<String, Value>,
	#[serde(default)]
	pub corpus: CorpusMeta,
	#[serde(default)]
	pub model_kind: String,
	#[serde(default)]
	pub notes: Vec<String>,
	#[serde(default)]
	pub repo_name: String,
	#[serde(default)]
	pub training: TrainingMeta,
	#[serde(default)]
	pub vocab_size: usize,
}
