use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LoadError, Result};
use crate::io::read_text;
use crate::model::config::{ArtifactDefaults, ModelConfig};

/// A training corpus offered by the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub description: String,
	/// Corpus file, e.g. `"000_cat_dog.txt"`.
	pub file: String,
}

/// Declarative index of corpora, models, shared artifact paths and
/// suggested prompts (`models.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsRegistry {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub artifact_defaults: Option<ArtifactDefaults>,
	pub corpora: Vec<CorpusConfig>,
	pub models: Vec<ModelConfig>,
	/// Suggested prompts keyed by corpus id.
	pub prompts: HashMap<String, Vec<String>>,
}

impl ModelsRegistry {
	/// Reads and validates a registry file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let text = read_text(path)?;
		Self::from_json_str(&text, &path.display().to_string())
	}

	/// Decodes a registry, checking its top-level shape first.
	///
	/// `location` only labels decoding errors.
	///
	/// # Errors
	/// - `Json` if the text is not JSON or members have the wrong shape
	/// - `RegistrySchema` if `corpora`, `models` or `prompts` is missing
	pub fn from_json_str(text: &str, location: &str) -> Result<Self> {
		let json_error = |source: serde_json::Error| LoadError::Json { location: location.to_owned(), source };

		let value: Value = serde_json::from_str(text).map_err(json_error)?;
		assert_registry_is_sane(&value)?;
		serde_json::from_value(value).map_err(json_error)
	}

	/// Returns the configured artifact defaults, or the built-in ones.
	pub fn defaults(&self) -> ArtifactDefaults {
		self.artifact_defaults.clone().unwrap_or_default()
	}

	pub fn find_model(&self, id: &str) -> Option<&ModelConfig> {
		self.models.iter().find(|model| model.id == id)
	}

	/// Suggested prompts for a corpus; empty when there are none.
	pub fn prompts_for(&self, corpus: &str) -> &[String] {
		self.prompts.get(corpus).map(Vec::as_slice).unwrap_or(&[])
	}
}

/// Shallow sanity check: `corpora` and `models` arrays, `prompts` object.
///
/// No deep validation happens here; member shapes are left to decoding.
pub fn assert_registry_is_sane(value: &Value) -> Result<()> {
	if !value.get("corpora").is_some_and(Value::is_array) {
		return Err(LoadError::RegistrySchema("Registry missing 'corpora' array.".to_owned()));
	}
	if !value.get("models").is_some_and(Value::is_array) {
		return Err(LoadError::RegistrySchema("Registry missing 'models' array.".to_owned()));
	}
	if !value.get("prompts").is_some_and(Value::is_object) {
		return Err(LoadError::RegistrySchema("Registry missing 'prompts' object.".to_owned()));
	}
	Ok(())
}
