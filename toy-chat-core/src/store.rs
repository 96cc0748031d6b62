use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::de::DeserializeOwned;

use crate::error::{LoadError, Result};
use crate::io::{normalize_folder, read_text, strip_leading_slashes};

/// Default host serving raw repository files.
pub const RAW_GITHUB_BASE: &str = "https://raw.githubusercontent.com";

/// Builds the raw-content URL of a file in a repository.
///
/// Example: `raw_url(RAW_GITHUB_BASE, "toy-gpt/m1", "main", "/artifacts/a.csv")`
/// → `https://raw.githubusercontent.com/toy-gpt/m1/main/artifacts/a.csv`
pub fn raw_url(base: &str, repo: &str, branch: &str, path: &str) -> String {
	format!(
		"{}/{repo}/{branch}/{}",
		base.trim_end_matches('/'),
		strip_leading_slashes(path)
	)
}

/// Source of artifact text, addressed by repository, branch and relative path.
///
/// Implementations must never hand back a cached payload: published artifacts
/// may change between two loads.
pub trait ArtifactStore {
	/// Fetches one artifact as text.
	fn fetch_text(&self, repo: &str, branch: &str, path: &str) -> Result<String>;
}

/// Fetches one artifact and decodes it as JSON.
pub fn fetch_json<T, S>(store: &S, repo: &str, branch: &str, path: &str) -> Result<T>
where
	T: DeserializeOwned,
	S: ArtifactStore + ?Sized,
{
	let text = store.fetch_text(repo, branch, path)?;
	serde_json::from_str(&text).map_err(|source| LoadError::Json {
		location: format!("{repo}/{branch}/{}", strip_leading_slashes(path)),
		source,
	})
}

/// Fetches artifacts over HTTP from a raw-content host.
///
/// Every request asks intermediaries and the server not to cache.
#[derive(Clone, Debug)]
pub struct RawHttpStore {
	client: Client,
	base_url: String,
}

impl RawHttpStore {
	/// Creates a store with a request timeout.
	///
	/// # Errors
	/// Returns `Transport` if the HTTP client cannot be built.
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
		let client = Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|source| LoadError::Transport { url: base_url.to_owned(), source })?;
		Ok(Self { client, base_url: base_url.to_owned() })
	}

	/// Store pointed at raw.githubusercontent.com with a 10 s timeout.
	pub fn github() -> Result<Self> {
		Self::new(RAW_GITHUB_BASE, Duration::from_secs(10))
	}
}

impl ArtifactStore for RawHttpStore {
	fn fetch_text(&self, repo: &str, branch: &str, path: &str) -> Result<String> {
		let url = raw_url(&self.base_url, repo, branch, path);
		debug!("GET {url}");

		let response = self.client
			.get(&url)
			.header(CACHE_CONTROL, "no-cache, no-store")
			.header(PRAGMA, "no-cache")
			.send()
			.map_err(|source| LoadError::Transport { url: url.clone(), source })?;

		let status = response.status();
		if !status.is_success() {
			return Err(LoadError::Fetch { status: status.as_u16(), url });
		}

		response.text().map_err(|source| LoadError::Transport { url, source })
	}
}

/// Reads artifacts from a local mirror laid out as `<root>/<repo>/<branch>/<path>`.
///
/// Files are re-read on every call.
#[derive(Clone, Debug)]
pub struct LocalStore {
	root: PathBuf,
}

impl LocalStore {
	pub fn new<P: AsRef<Path>>(root: P) -> Self {
		Self { root: normalize_folder(root.as_ref()) }
	}

	/// Location of an artifact on disk.
	pub fn locate(&self, repo: &str, branch: &str, path: &str) -> PathBuf {
		self.root.join(repo).join(branch).join(strip_leading_slashes(path))
	}
}

impl ArtifactStore for LocalStore {
	fn fetch_text(&self, repo: &str, branch: &str, path: &str) -> Result<String> {
		let file = self.locate(repo, branch, path);
		debug!("Reading {}", file.display());
		read_text(file)
	}
}
