use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, Result};

/// Reads a whole text file into memory.
///
/// The path is kept in the error so a failed load names the missing artifact.
pub(crate) fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
	let path = path.as_ref();
	fs::read_to_string(path).map_err(|source| LoadError::Io {
		path: path.to_path_buf(),
		source,
	})
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Removes every leading `/` from an artifact-relative path.
///
/// Examples:
/// - `"/artifacts/00_meta.json"` → `"artifacts/00_meta.json"`
/// - `"//a.csv"` → `"a.csv"`
pub(crate) fn strip_leading_slashes(path: &str) -> &str {
	path.trim_start_matches('/')
}
