use std::collections::HashMap;

use log::debug;

use super::csv::{cell, header_index, parse_csv, parse_int};
use crate::error::{LoadError, Result};

/// One data row of the vocabulary artifact.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenRow {
	pub token_id: usize,
	pub token: String,
	pub frequency: i64,
}

/// Bidirectional token ↔ id mapping plus per-token frequencies.
///
/// Ids are taken verbatim from the artifact's `token_id` column.
/// Lookups are exact string matches, case-sensitive as stored.
///
/// # Invariants
/// - Both maps are filled together at construction and never mutated afterward
/// - For a well-formed artifact, ids are dense in `[0, len())`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vocabulary {
	token_to_id: HashMap<String, usize>,
	id_to_token: HashMap<usize, String>,
	token_freq: HashMap<String, i64>,
}

impl Vocabulary {
	/// Builds the maps from parsed rows.
	///
	/// A later row sharing a `token_id` with an earlier one overwrites it.
	pub fn from_rows(rows: impl IntoIterator<Item = TokenRow>) -> Self {
		let mut vocab = Self::default();
		for row in rows {
			vocab.token_to_id.insert(row.token.clone(), row.token_id);
			vocab.id_to_token.insert(row.token_id, row.token.clone());
			vocab.token_freq.insert(row.token, row.frequency);
		}
		vocab
	}

	/// Parses a vocabulary artifact and builds the maps.
	///
	/// # Errors
	/// - `Schema` if `token_id`, `token` or `frequency` is missing from the header
	/// - `Parse` if an integer cell is malformed
	pub fn from_csv(text: &str) -> Result<Self> {
		let rows = parse_vocabulary_csv(text)?;
		debug!("Parsed {} vocabulary rows", rows.len());
		Ok(Self::from_rows(rows))
	}

	/// Returns the id of `token`, if present.
	pub fn id_of(&self, token: &str) -> Option<usize> {
		self.token_to_id.get(token).copied()
	}

	/// Returns the token stored at `id`, if present.
	pub fn token_of(&self, id: usize) -> Option<&str> {
		self.id_to_token.get(&id).map(String::as_str)
	}

	/// Returns the corpus frequency of `token`, if present.
	pub fn frequency(&self, token: &str) -> Option<i64> {
		self.token_freq.get(token).copied()
	}

	/// Number of distinct ids.
	pub fn len(&self) -> usize {
		self.id_to_token.len()
	}

	pub fn is_empty(&self) -> bool {
		self.id_to_token.is_empty()
	}

	/// Iterates over `(id, token)` pairs in ascending id order.
	pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
		let mut ids: Vec<usize> = self.id_to_token.keys().copied().collect();
		ids.sort_unstable();
		ids.into_iter().filter_map(move |id| self.token_of(id).map(|token| (id, token)))
	}
}

/// Parses the rows of a vocabulary artifact.
///
/// The three required columns are located by case-insensitive header match,
/// in any order; extra columns are ignored. A header-only or empty document
/// yields no rows.
pub fn parse_vocabulary_csv(text: &str) -> Result<Vec<TokenRow>> {
	let table = parse_csv(text);
	let Some((header, data)) = table.split_first() else {
		return Ok(Vec::new());
	};

	let (Some(id_idx), Some(token_idx), Some(freq_idx)) = (
		header_index(header, "token_id"),
		header_index(header, "token"),
		header_index(header, "frequency"),
	) else {
		return Err(LoadError::Schema(format!(
			"Vocabulary CSV must have header: token_id,token,frequency (got: {})",
			header.join(",")
		)));
	};

	data.iter()
		.map(|row| -> Result<TokenRow> {
			Ok(TokenRow {
				token_id: parse_int(cell(row, id_idx, ""))?,
				token: cell(row, token_idx, "").to_owned(),
				frequency: parse_int(cell(row, freq_idx, ""))?,
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const VOCAB: &str = "token_id,token,frequency\n0,the,12\n1,cat,3\n2,sat,2\n";

	#[test]
	fn every_declared_pair_round_trips() {
		let vocab = Vocabulary::from_csv(VOCAB).unwrap();
		let declared = [(0, "the"), (1, "cat"), (2, "sat")];

		assert_eq!(vocab.len(), declared.len());
		for (id, token) in declared {
			assert_eq!(vocab.token_of(id), Some(token));
			assert_eq!(vocab.id_of(token), Some(id));
		}
		assert_eq!(vocab.frequency("the"), Some(12));
	}

	#[test]
	fn columns_may_come_in_any_order_and_case() {
		let vocab = Vocabulary::from_csv("Frequency,extra,TOKEN,Token_Id\n7,x,dog,1\n9,y,cat,0\n").unwrap();
		assert_eq!(vocab.id_of("dog"), Some(1));
		assert_eq!(vocab.token_of(0), Some("cat"));
		assert_eq!(vocab.frequency("cat"), Some(9));
	}

	#[test]
	fn lookups_are_case_sensitive() {
		let vocab = Vocabulary::from_csv(VOCAB).unwrap();
		assert_eq!(vocab.id_of("The"), None);
	}

	#[test]
	fn missing_header_is_a_schema_error() {
		let err = Vocabulary::from_csv("token_id,token\n0,a\n").unwrap_err();
		assert!(matches!(err, LoadError::Schema(_)));
		assert!(err.to_string().contains("token_id,token"));
	}

	#[test]
	fn malformed_integers_are_parse_errors() {
		let err = Vocabulary::from_csv("token_id,token,frequency\nzero,a,1\n").unwrap_err();
		assert_eq!(err.to_string(), "Expected int, got: zero");

		let err = Vocabulary::from_csv("token_id,token,frequency\n0,a,\n").unwrap_err();
		assert!(matches!(err, LoadError::Parse { expected: "int", .. }));
	}

	#[test]
	fn frequencies_may_be_negative() {
		let vocab = Vocabulary::from_csv("token_id,token,frequency\n0,a,-1\n").unwrap();
		assert_eq!(vocab.frequency("a"), Some(-1));
	}

	#[test]
	fn ids_are_kept_verbatim_even_when_huge() {
		let vocab = Vocabulary::from_csv("token_id,token,frequency\n18446744073709551615,a,1\n").unwrap();
		assert_eq!(vocab.len(), 1);
		assert_eq!(vocab.id_of("a"), Some(usize::MAX));
	}

	#[test]
	fn duplicate_ids_keep_the_last_row() {
		let vocab = Vocabulary::from_csv("token_id,token,frequency\n0,a,1\n0,b,2\n").unwrap();
		assert_eq!(vocab.len(), 1);
		assert_eq!(vocab.token_of(0), Some("b"));
	}

	#[test]
	fn empty_and_header_only_documents_are_empty() {
		assert!(Vocabulary::from_csv("").unwrap().is_empty());
		assert!(Vocabulary::from_csv("token_id,token,frequency\n").unwrap().is_empty());
	}

	#[test]
	fn entries_are_in_id_order() {
		let vocab = Vocabulary::from_csv("token_id,token,frequency\n2,c,1\n0,a,1\n1,b,1\n").unwrap();
		let entries: Vec<_> = vocab.entries().collect();
		assert_eq!(entries, vec![(0, "a"), (1, "b"), (2, "c")]);
	}

	#[test]
	fn parsing_twice_is_value_equal() {
		assert_eq!(Vocabulary::from_csv(VOCAB).unwrap(), Vocabulary::from_csv(VOCAB).unwrap());
	}
}
