use std::collections::HashMap;

use crate::{AllowedFieldSet, MatchResult};

/// Aggregates sample-pass results into the field set allowed for the full
/// pass: each side's field name is counted under its own (module, role), and
/// the top `top_n` names by frequency are kept.
///
/// Ties keep first-seen order. A (module, role) with no sample matches gets no
/// allowed fields and drops out of the full pass entirely.
pub fn select_top_fields(results: &[MatchResult], top_n: usize) -> AllowedFieldSet {
	let mut tallies: HashMap<String, HashMap<String, Vec<(String, u64)>>> = HashMap::new();

	for result in results {
		for side in [&result.entry1, &result.entry2] {
			let counts = tallies
				.entry(side.module.clone())
				.or_default()
				.entry(side.role.clone())
				.or_default();

			match counts.iter_mut().find(|(name, _)| name == &side.field) {
				Some((_, count)) => *count += 1,
				None => counts.push((side.field.clone(), 1)),
			}
		}
	}

	let mut out = AllowedFieldSet::new();

	for (module, roles) in tallies {
		let selected = out.entry(module).or_default();

		for (role, mut counts) in roles {
			// Stable sort, so equal counts keep first-seen order.
			counts.sort_by(|a, b| b.1.cmp(&a.1));

			let fields = counts.into_iter().take(top_n).map(|(name, _)| name).collect();

			selected.insert(role, fields);
		}
	}

	out
}
