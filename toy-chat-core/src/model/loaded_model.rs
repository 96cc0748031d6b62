use log::{debug, info};

use crate::artifact::paths::resolve_meta_path;
use crate::artifact::{
	ArtifactPaths, Layout, StateVocab, Vocabulary, WeightsMatrix, parse_layout_csv, parse_weights_csv,
};
use crate::error::Result;
use crate::model::config::{ArtifactDefaults, ModelConfig, ModelMeta};
use crate::store::{ArtifactStore, fetch_json};

/// A fully assembled model: configuration, descriptor and parsed artifacts.
///
/// Built once by [`LoadedModel::load`] and never mutated afterward, so it can
/// be shared read-only between any number of inference calls.
///
/// # Invariants
/// - `weights` has one row per state of `state_vocab`
/// - every weight row is `vocab.len()` wide
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedModel {
	config: ModelConfig,
	meta: ModelMeta,
	vocab: Vocabulary,
	weights: WeightsMatrix,
	state_vocab: Option<StateVocab>,
	state_layout: Option<Layout>,
}

impl LoadedModel {
	/// Fetches and parses every artifact of a model, in order:
	/// 1. the meta descriptor
	/// 2. the vocabulary named by the descriptor
	/// 3. the weights, checked against that vocabulary
	/// 4. the layout, when a layout path resolves
	///
	/// The first failing step aborts the load; no partial model is returned.
	pub fn load<S>(store: &S, config: &ModelConfig, defaults: &ArtifactDefaults) -> Result<Self>
	where
		S: ArtifactStore + ?Sized,
	{
		let repo = config.repo.as_str();
		let branch = config.branch.as_str();

		let meta: ModelMeta = fetch_json(store, repo, branch, resolve_meta_path(defaults))?;
		let paths = ArtifactPaths::resolve(config, defaults, &meta);
		debug!("Resolved artifacts for '{}': {:?}", config.id, paths);

		let vocab = Vocabulary::from_csv(&store.fetch_text(repo, branch, &paths.vocab)?)?;

		let weights_csv = store.fetch_text(repo, branch, &paths.weights)?;
		let (weights, state_vocab) = parse_weights_csv(&weights_csv, &vocab)?;

		let state_layout = match &paths.layout {
			Some(path) => Some(parse_layout_csv(&store.fetch_text(repo, branch, path)?)?),
			None => None,
		};

		info!(
			"Loaded model '{}': {} tokens, {} states, layout: {}",
			config.id,
			vocab.len(),
			state_vocab.len(),
			state_layout.as_ref().map_or(0, |l| l.len())
		);

		Ok(Self::from_parts(config.clone(), meta, vocab, weights, Some(state_vocab), state_layout))
	}

	/// Assembles a model from already-parsed parts.
	pub fn from_parts(
		config: ModelConfig,
		meta: ModelMeta,
		vocab: Vocabulary,
		weights: WeightsMatrix,
		state_vocab: Option<StateVocab>,
		state_layout: Option<Layout>,
	) -> Self {
		Self { config, meta, vocab, weights, state_vocab, state_layout }
	}

	pub fn id(&self) -> &str {
		&self.config.id
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn meta(&self) -> &ModelMeta {
		&self.meta
	}

	pub fn vocab(&self) -> &Vocabulary {
		&self.vocab
	}

	pub fn weights(&self) -> &WeightsMatrix {
		&self.weights
	}

	pub fn state_vocab(&self) -> Option<&StateVocab> {
		self.state_vocab.as_ref()
	}

	pub fn state_layout(&self) -> Option<&Layout> {
		self.state_layout.as_ref()
	}
}
