//! Model configuration and assembly.
//!
//! - Registry-side configuration (`ModelConfig`, `ArtifactDefaults`)
//! - The published descriptor (`ModelMeta`)
//! - The assembled, immutable `LoadedModel`

/// Serde mappings of the registry entries and of `00_meta.json`.
pub mod config;

/// Fail-fast assembly of a `LoadedModel` from an artifact store.
pub mod loaded_model;

pub use config::{ArtifactDefaults, ArtifactIndex, ArtifactOverrides, ModelConfig, ModelMeta};
pub use loaded_model::LoadedModel;
