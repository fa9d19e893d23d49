use std::{cmp::Ordering, collections::HashMap};

use crate::{BucketMap, MatchResult};

/// Grouping key for results whose first entry carries no module name.
pub const UNKNOWN_MODULE: &str = "unknown";

/// Partitions match results into `bucket_count` contiguous rank buckets per
/// module.
///
/// Results are grouped by `entry1.module`, sorted by descending score (stable,
/// so ties keep their relative order), then assigned by rank:
/// `bucket = min(idx / max(count / bucket_count, 1), bucket_count - 1)`. The
/// last bucket absorbs the division remainder. This is a pure rank partition,
/// not clustering: near-identical scores can land in different buckets purely
/// by position.
pub fn bucket_by_module(results: Vec<MatchResult>, bucket_count: usize) -> BucketMap {
	let mut grouped: HashMap<String, Vec<MatchResult>> = HashMap::new();

	for result in results {
		let module = if result.entry1.module.is_empty() {
			UNKNOWN_MODULE.to_string()
		} else {
			result.entry1.module.clone()
		};

		grouped.entry(module).or_default().push(result);
	}

	let mut out = BucketMap::new();

	for (module, mut group) in grouped {
		group.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

		let bucket_size = (group.len() / bucket_count).max(1);
		let buckets = out.entry(module).or_default();

		for idx in 0..bucket_count {
			buckets.insert(idx, Vec::new());
		}
		for (idx, result) in group.into_iter().enumerate() {
			let bucket = (idx / bucket_size).min(bucket_count - 1);

			if let Some(members) = buckets.get_mut(&bucket) {
				members.push(result);
			}
		}
	}

	out
}
