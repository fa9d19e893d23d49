use std::{fs, path::Path};

use serde_json::{Value, json};

use promatch_domain::{BucketMap, MatchResult};

/// Writes the sample-pass scores as a pretty-printed JSON array.
pub fn write_scores(path: &Path, results: &[MatchResult]) -> color_eyre::Result<()> {
	fs::write(path, serde_json::to_string_pretty(results)?)?;

	Ok(())
}

/// Appends the full-pass selection count to the scores report. A missing file
/// starts a fresh array, so the count survives even when the scores write was
/// skipped.
pub fn append_count(path: &Path, selected: usize) -> color_eyre::Result<()> {
	let mut doc: Value = match fs::read_to_string(path) {
		Ok(raw) => serde_json::from_str(&raw)?,
		Err(_) => Value::Array(Vec::new()),
	};
	let Value::Array(items) = &mut doc else {
		return Err(color_eyre::eyre::eyre!("Report file must contain a JSON array."));
	};

	items.push(json!({ "selected_similarity_count": selected }));
	fs::write(path, serde_json::to_string_pretty(&doc)?)?;

	Ok(())
}

pub fn write_buckets(path: &Path, buckets: &BucketMap) -> color_eyre::Result<()> {
	fs::write(path, serde_json::to_string_pretty(buckets)?)?;

	Ok(())
}
