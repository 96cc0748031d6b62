//! Toy language model loading and next-token inference.
//!
//! This crate loads small published n-gram-style models (unigram up to a
//! three-token context) and predicts the next token of a prompt:
//! - Parsing of the CSV/JSON artifacts into a typed, immutable model
//! - Resolution of artifact paths inside a model repository
//! - Fetching from a raw-content host or a local mirror, never cached
//! - Context-window-aware inference: softmax, entropy, top-k, confidence
//!
//! Loading is fail-fast; inference never fails.

/// Artifact parsers: CSV tables, vocabularies, weights, layouts, paths.
pub mod artifact;

/// Error type shared by every loading step.
pub mod error;

/// Next-token prediction, entropy comparison and prompt continuation.
pub mod inference;

/// Model configuration, published descriptor and the assembled model.
pub mod model;

/// Registry of available corpora, models and suggested prompts.
pub mod registry;

/// Where artifact text comes from (HTTP or local directory).
pub mod store;

/// File helpers.
///
/// Not exposed
pub(crate) mod io;

pub use error::{LoadError, Result};
pub use inference::{InferOptions, PredictionResult, infer_next_token};
pub use model::{ArtifactDefaults, LoadedModel, ModelConfig, ModelMeta};
pub use registry::ModelsRegistry;
pub use store::{ArtifactStore, LocalStore, RawHttpStore};
