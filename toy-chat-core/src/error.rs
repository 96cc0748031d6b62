use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching and parsing model artifacts or the registry.
///
/// Every variant is raised at the point of detection and propagated as-is
/// through model assembly: a failed load never yields a partial model.
#[derive(Debug, Error)]
pub enum LoadError {
	/// A required header is missing, or a weights column names a token
	/// unknown to the vocabulary.
	#[error("{0}")]
	Schema(String),

	/// A cell could not be parsed as the expected numeric type.
	#[error("Expected {expected}, got: {value}")]
	Parse {
		expected: &'static str,
		value: String,
	},

	/// A weights row does not carry one value per output-token column.
	#[error("Weights row for '{state}' has {found} values, expected {expected}.")]
	RowShape {
		state: String,
		found: usize,
		expected: usize,
	},

	/// The artifact store answered with a non-success status.
	#[error("Fetch failed: {status} for {url}")]
	Fetch {
		status: u16,
		url: String,
	},

	/// The registry lacks one of its required top-level members.
	#[error("{0}")]
	RegistrySchema(String),

	/// The request never produced a response (DNS, TLS, timeout...).
	#[error("Request to {url} failed: {source}")]
	Transport {
		url: String,
		#[source]
		source: reqwest::Error,
	},

	/// A JSON document could not be decoded.
	#[error("Invalid JSON in {location}: {source}")]
	Json {
		location: String,
		#[source]
		source: serde_json::Error,
	},

	/// A local artifact could not be read.
	#[error("Failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl LoadError {
	pub(crate) fn parse_int(value: &str) -> Self {
		Self::Parse { expected: "int", value: value.to_owned() }
	}

	pub(crate) fn parse_float(value: &str) -> Self {
		Self::Parse { expected: "float", value: value.to_owned() }
	}
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, LoadError>;
