//! Parsers for the published model artifacts.
//!
//! - `csv`: the minimal comma splitter every CSV artifact goes through
//! - `vocabulary`: token ↔ id maps (`01_vocabulary.csv`)
//! - `state_vocab`: state label ↔ id maps built from weight rows
//! - `weights`: the `[state][token]` matrix (`02_model_weights.csv`)
//! - `layout`: optional 2-D coordinates (`03_token_embeddings.csv`)
//! - `paths`: where each artifact lives inside a model repository

pub mod csv;
pub mod layout;
pub mod paths;
pub mod state_vocab;
pub mod vocabulary;
pub mod weights;

pub use layout::{Layout, LayoutPoint, parse_layout_csv};
pub use paths::ArtifactPaths;
pub use state_vocab::StateVocab;
pub use vocabulary::{TokenRow, Vocabulary};
pub use weights::{WeightsMatrix, parse_weights_csv};
