use log::debug;

use super::csv::{parse_csv, parse_float};
use super::state_vocab::StateVocab;
use super::vocabulary::Vocabulary;
use crate::error::{LoadError, Result};

/// Dense `[state_id][token_id]` weight table.
///
/// Every row has the same width (the vocabulary size). Cells never listed in
/// the artifact hold `0.0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightsMatrix {
	rows: Vec<Vec<f64>>,
}

impl WeightsMatrix {
	/// Creates a zero-filled matrix.
	pub fn zeros(num_states: usize, width: usize) -> Self {
		Self { rows: vec![vec![0.0; width]; num_states] }
	}

	/// Returns the weight row of a state, if the state exists.
	pub fn row(&self, state_id: usize) -> Option<&[f64]> {
		self.rows.get(state_id).map(Vec::as_slice)
	}

	pub fn num_states(&self) -> usize {
		self.rows.len()
	}

	/// Row width (zero for a matrix without states).
	pub fn width(&self) -> usize {
		self.rows.first().map_or(0, Vec::len)
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	fn set(&mut self, state_id: usize, token_id: usize, value: f64) {
		self.rows[state_id][token_id] = value;
	}
}

impl From<Vec<Vec<f64>>> for WeightsMatrix {
	fn from(rows: Vec<Vec<f64>>) -> Self {
		Self { rows }
	}
}

/// Parses a weights artifact against an already-built vocabulary.
///
/// Header: `input_token,<out_1>,<out_2>,...`. Each data row starts with a state
/// label followed by one weight per output column. Rows with a blank label are
/// skipped. A document with fewer than two rows yields an empty matrix and an
/// empty state vocabulary.
///
/// # Errors
/// - `Schema` if the first header is not `input_token`, if there are no output
///   columns, or if an output column names a token missing from `vocab` or
///   whose id does not fit in a row of `vocab.len()` weights
/// - `RowShape` if a row's value count differs from the output column count
/// - `Parse` if a weight is not a finite float
pub fn parse_weights_csv(text: &str, vocab: &Vocabulary) -> Result<(WeightsMatrix, StateVocab)> {
	let table = parse_csv(text);
	if table.len() < 2 {
		return Ok((WeightsMatrix::default(), StateVocab::default()));
	}

	let header = &table[0];
	let data = &table[1..];

	let first = header.first().map(String::as_str).unwrap_or("");
	if !first.eq_ignore_ascii_case("input_token") {
		return Err(LoadError::Schema(format!(
			"Weights CSV first column must be 'input_token' (got: {first})"
		)));
	}

	let output_tokens = &header[1..];
	if output_tokens.is_empty() {
		return Err(LoadError::Schema(
			"Weights CSV must include output token columns after input_token.".to_owned(),
		));
	}

	// Resolve every output column up front: an unknown token would misalign the row
	let width = vocab.len();
	let output_ids = output_tokens
		.iter()
		.map(|token| -> Result<usize> {
			let id = vocab.id_of(token).ok_or_else(|| {
				LoadError::Schema(format!("Weights CSV output token not in vocabulary: {token}"))
			})?;
			if id >= width {
				return Err(LoadError::Schema(format!(
					"Weights CSV output token '{token}' has id {id}, outside a vocabulary of {width} tokens"
				)));
			}
			Ok(id)
		})
		.collect::<Result<Vec<usize>>>()?;

	let labelled_rows: Vec<(&str, &[String])> = data
		.iter()
		.filter_map(|row| {
			let (label, values) = row.split_first()?;
			(!label.is_empty()).then_some((label.as_str(), values))
		})
		.collect();

	let states = StateVocab::from_labels(labelled_rows.iter().map(|(label, _)| *label));
	let mut weights = WeightsMatrix::zeros(states.len(), width);

	for (label, values) in labelled_rows {
		let Some(state_id) = states.id_of(label) else {
			continue;
		};

		if values.len() != output_ids.len() {
			return Err(LoadError::RowShape {
				state: label.to_owned(),
				found: values.len(),
				expected: output_ids.len(),
			});
		}

		for (raw, &token_id) in values.iter().zip(&output_ids) {
			weights.set(state_id, token_id, parse_float(raw)?);
		}
	}

	debug!(
		"Parsed weights: {} states x {} tokens ({} output columns)",
		weights.num_states(),
		width,
		output_ids.len()
	);

	Ok((weights, states))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn abc() -> Vocabulary {
		Vocabulary::from_csv("token_id,token,frequency\n0,a,1\n1,b,1\n2,c,1\n").unwrap()
	}

	#[test]
	fn single_row_fills_the_matrix() {
		let (weights, states) = parse_weights_csv("input_token,a,b,c\ns0,1,2,3\n", &abc()).unwrap();
		assert_eq!(weights.num_states(), 1);
		assert_eq!(weights.row(0), Some(&[1.0, 2.0, 3.0][..]));
		assert_eq!(states.id_of("s0"), Some(0));
	}

	#[test]
	fn columns_map_to_token_ids_not_positions() {
		let (weights, _) = parse_weights_csv("input_token,c,a\ns0,5,7\n", &abc()).unwrap();
		assert_eq!(weights.row(0), Some(&[7.0, 0.0, 5.0][..]));
	}

	#[test]
	fn unlisted_tokens_stay_zero() {
		let (weights, _) = parse_weights_csv("INPUT_TOKEN,b\nx,4\ny,-1\n", &abc()).unwrap();
		assert_eq!(weights.num_states(), 2);
		assert_eq!(weights.width(), 3);
		assert_eq!(weights.row(1), Some(&[0.0, -1.0, 0.0][..]));
	}

	#[test]
	fn out_of_range_token_ids_are_schema_errors() {
		let vocab = Vocabulary::from_csv("token_id,token,frequency\n18446744073709551615,a,1\n").unwrap();
		let err = parse_weights_csv("input_token,a\ns0,1\n", &vocab).unwrap_err();
		assert!(matches!(err, LoadError::Schema(_)));
		assert!(err.to_string().contains("'a'"));

		let vocab = Vocabulary::from_csv("token_id,token,frequency\n0,a,1\n4000000000,b,1\n").unwrap();
		let err = parse_weights_csv("input_token,a,b\ns0,1,2\n", &vocab).unwrap_err();
		assert!(matches!(err, LoadError::Schema(_)));
	}

	#[test]
	fn short_row_is_a_row_shape_error() {
		let err = parse_weights_csv("input_token,a,b,c\ns0,1,2\n", &abc()).unwrap_err();
		match err {
			LoadError::RowShape { state, found, expected } => {
				assert_eq!(state, "s0");
				assert_eq!(found, 2);
				assert_eq!(expected, 3);
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn wrong_first_header_is_a_schema_error() {
		let err = parse_weights_csv("state,a\ns0,1\n", &abc()).unwrap_err();
		assert!(matches!(err, LoadError::Schema(_)));
	}

	#[test]
	fn missing_output_columns_is_a_schema_error() {
		let err = parse_weights_csv("input_token\ns0\n", &abc()).unwrap_err();
		assert!(matches!(err, LoadError::Schema(_)));
	}

	#[test]
	fn unknown_output_token_is_named() {
		let err = parse_weights_csv("input_token,a,zebra\ns0,1,2\n", &abc()).unwrap_err();
		assert!(matches!(err, LoadError::Schema(_)));
		assert!(err.to_string().contains("zebra"));
	}

	#[test]
	fn bad_weight_is_a_parse_error() {
		let err = parse_weights_csv("input_token,a\ns0,heavy\n", &abc()).unwrap_err();
		assert_eq!(err.to_string(), "Expected float, got: heavy");
	}

	#[test]
	fn degenerate_documents_are_empty() {
		let (weights, states) = parse_weights_csv("", &abc()).unwrap();
		assert!(weights.is_empty());
		assert!(states.is_empty());

		let (weights, states) = parse_weights_csv("input_token,a,b,c\n", &abc()).unwrap();
		assert!(weights.is_empty());
		assert!(states.is_empty());
	}

	#[test]
	fn blank_labels_are_skipped_and_repeats_share_a_state() {
		let text = "input_token,a\n,9\ns0,1\ns1,2\ns0,3\n";
		let (weights, states) = parse_weights_csv(text, &abc()).unwrap();
		assert_eq!(states.len(), 2);
		assert_eq!(weights.row(0), Some(&[3.0, 0.0, 0.0][..]));
		assert_eq!(weights.row(1), Some(&[2.0, 0.0, 0.0][..]));
	}

	#[test]
	fn parsing_twice_is_value_equal() {
		let text = "input_token,a,b,c\ns0,1,2,3\ns1,0.5,0,-2\n";
		assert_eq!(
			parse_weights_csv(text, &abc()).unwrap(),
			parse_weights_csv(text, &abc()).unwrap()
		);
	}
}
