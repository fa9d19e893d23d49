use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use promatch_domain::{Entry, MatchResult, MatchSide, TextClass, ValueClass};

use crate::{Scorer, VectorSink};

/// Everything one matching pass produced.
pub struct PassOutcome {
	pub results: Vec<MatchResult>,
	/// Tasks that panicked or were cancelled. The pass keeps going; the caller
	/// decides whether a partial result is acceptable.
	pub failed_tasks: usize,
}

/// Runs one matching pass over the extracted entries.
///
/// Each entry spawns a task comparing it against every later entry, so every
/// unordered pair is scored exactly once. Concurrency is capped by `workers`.
/// When a vector sink is given, qualifying long-text matches are forwarded to
/// it as they are found.
pub async fn run_pass(
	entries: Vec<Entry>,
	scorer: Arc<Scorer>,
	threshold: f32,
	workers: usize,
	vectors: Option<Arc<dyn VectorSink>>,
) -> PassOutcome {
	let entries = Arc::new(entries);
	let semaphore = Arc::new(Semaphore::new(workers.max(1)));
	let mut tasks = JoinSet::new();

	for origin in 0..entries.len() {
		let entries = entries.clone();
		let scorer = scorer.clone();
		let semaphore = semaphore.clone();
		let vectors = vectors.clone();

		tasks.spawn(async move {
			// Acquisition only fails when the semaphore is closed, which
			// nothing here does.
			let Ok(_permit) = semaphore.acquire_owned().await else {
				return Vec::new();
			};

			compare_from(origin, &entries, &scorer, threshold, vectors.as_deref()).await
		});
	}

	let mut results = Vec::new();
	let mut failed_tasks = 0;

	while let Some(joined) = tasks.join_next().await {
		match joined {
			Ok(mut found) => results.append(&mut found),
			Err(err) => {
				tracing::error!("Match task failed: {err}.");

				failed_tasks += 1;
			},
		}
	}

	PassOutcome { results, failed_tasks }
}

/// Compares the origin entry against every later partner with the same module
/// and a different role, over the text fields of both sides.
async fn compare_from(
	origin: usize,
	entries: &[Entry],
	scorer: &Scorer,
	threshold: f32,
	vectors: Option<&dyn VectorSink>,
) -> Vec<MatchResult> {
	let entry1 = &entries[origin];
	let mut results = Vec::new();

	if entry1.fields.is_empty() {
		return results;
	}

	for entry2 in &entries[origin + 1..] {
		if entry2.module != entry1.module || entry2.role == entry1.role {
			continue;
		}

		for field1 in &entry1.fields {
			let ValueClass::Text(text1) = &field1.value else {
				continue;
			};

			for field2 in &entry2.fields {
				let ValueClass::Text(text2) = &field2.value else {
					continue;
				};
				let Some(scored) = scorer.score(text1, text2).await else {
					continue;
				};

				if scored.score < threshold {
					continue;
				}

				if scored.text_class == TextClass::Long {
					if let Some(sink) = vectors {
						if let Err(err) =
							sink.upsert_pair(text1, &scored.vector1, text2, &scored.vector2).await
						{
							tracing::warn!("Failed to store match vectors: {err}.");
						}
					}
				}

				results.push(MatchResult {
					entry1: side(entry1, &field1.name, text1),
					entry2: side(entry2, &field2.name, text2),
					score: scored.score,
					text_class: scored.text_class,
				});
			}
		}
	}

	results
}

fn side(entry: &Entry, field: &str, value: &str) -> MatchSide {
	MatchSide {
		module: entry.module.clone(),
		role: entry.role.clone(),
		entry_index: entry.entry_index,
		field: field.to_string(),
		value: value.to_string(),
	}
}
