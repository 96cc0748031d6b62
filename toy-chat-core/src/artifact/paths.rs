use log::warn;

use crate::model::config::{ArtifactDefaults, ModelConfig, ModelMeta};

/// Concrete repository-relative paths of one model's artifacts.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactPaths {
	pub vocab: String,
	pub weights: String,
	/// `None` when the model has no layout to show.
	pub layout: Option<String>,
}

impl ArtifactPaths {
	/// Resolves the vocabulary, weights and layout paths of a model.
	///
	/// Each path is the folder of the matching default joined with the
	/// filename the meta descriptor declares. Layout resolution order:
	/// 1. a non-blank per-model override, used verbatim
	/// 2. the default layout folder joined with the declared layout filename
	/// 3. no layout, when no default layout path is configured
	pub fn resolve(config: &ModelConfig, defaults: &ArtifactDefaults, meta: &ModelMeta) -> Self {
		Self {
			vocab: join_folder(folder_of(&defaults.vocab_path), &meta.artifacts.vocabulary),
			weights: join_folder(folder_of(&defaults.weights_path), &meta.artifacts.weights),
			layout: resolve_layout_path(config, defaults, meta),
		}
	}
}

/// The meta descriptor always lives at the configured default path.
pub fn resolve_meta_path(defaults: &ArtifactDefaults) -> &str {
	&defaults.meta_path
}

fn resolve_layout_path(config: &ModelConfig, defaults: &ArtifactDefaults, meta: &ModelMeta) -> Option<String> {
	if let Some(path) = config.layout_override() {
		return Some(path.to_owned());
	}

	let default = defaults.layout_path.as_deref().filter(|p| !p.trim().is_empty())?;

	match meta.artifacts.token_embeddings.as_deref() {
		Some(filename) => Some(join_folder(folder_of(default), filename)),
		None => {
			warn!("Model '{}' declares no layout artifact, skipping layout", config.id);
			None
		}
	}
}

/// Everything before the last `/`, or `""` for a bare filename.
fn folder_of(path: &str) -> &str {
	path.rfind('/').map_or("", |idx| &path[..idx])
}

fn join_folder(folder: &str, filename: &str) -> String {
	if folder.is_empty() {
		filename.to_owned()
	} else {
		format!("{folder}/{filename}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::config::ArtifactOverrides;

	fn config(layout_override: Option<&str>) -> ModelConfig {
		ModelConfig {
			id: "m".to_owned(),
			corpus: "c".to_owned(),
			architecture: "bigram".to_owned(),
			context_window: 1,
			repo: "toy/m".to_owned(),
			branch: "main".to_owned(),
			artifacts: layout_override.map(|p| ArtifactOverrides { layout_path: Some(p.to_owned()) }),
		}
	}

	fn meta(layout: Option<&str>) -> ModelMeta {
		serde_json::from_value(serde_json::json!({
			"artifacts": {
				"00_meta.json": "00_meta.json",
				"01_vocabulary.csv": "vocab_v2.csv",
				"02_model_weights.csv": "weights_v2.csv",
				"03_token_embeddings.csv": layout,
			}
		}))
		.unwrap()
	}

	#[test]
	fn joins_default_folders_with_declared_filenames() {
		let paths = ArtifactPaths::resolve(&config(None), &ArtifactDefaults::default(), &meta(Some("layout_v2.csv")));
		assert_eq!(paths.vocab, "artifacts/vocab_v2.csv");
		assert_eq!(paths.weights, "artifacts/weights_v2.csv");
		assert_eq!(paths.layout.as_deref(), Some("artifacts/layout_v2.csv"));
	}

	#[test]
	fn bare_default_filenames_have_no_folder() {
		let defaults = ArtifactDefaults {
			meta_path: "meta.json".to_owned(),
			vocab_path: "vocab.csv".to_owned(),
			weights_path: "deep/nested/weights.csv".to_owned(),
			layout_path: None,
		};
		let paths = ArtifactPaths::resolve(&config(None), &defaults, &meta(Some("l.csv")));
		assert_eq!(paths.vocab, "vocab_v2.csv");
		assert_eq!(paths.weights, "deep/nested/weights_v2.csv");
		assert_eq!(paths.layout, None);
		assert_eq!(resolve_meta_path(&defaults), "meta.json");
	}

	#[test]
	fn override_wins_over_defaults() {
		let paths = ArtifactPaths::resolve(
			&config(Some("custom/points.csv")),
			&ArtifactDefaults::default(),
			&meta(Some("layout_v2.csv")),
		);
		assert_eq!(paths.layout.as_deref(), Some("custom/points.csv"));
	}

	#[test]
	fn blank_override_falls_back_to_default() {
		let paths = ArtifactPaths::resolve(&config(Some("   ")), &ArtifactDefaults::default(), &meta(Some("e.csv")));
		assert_eq!(paths.layout.as_deref(), Some("artifacts/e.csv"));
	}

	#[test]
	fn undeclared_layout_file_means_no_layout() {
		let paths = ArtifactPaths::resolve(&config(None), &ArtifactDefaults::default(), &meta(None));
		assert_eq!(paths.layout, None);
	}
}
