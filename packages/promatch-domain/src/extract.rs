use rand::Rng;
use serde_json::{Map, Value};

use crate::{AllowedFieldSet, Entry, EntryField, value};

/// Identifying fields that are never compared, in any pass.
pub const EXCLUDED_FIELDS: [&str; 5] = ["name", "phone", "contact", "mobile number", "email"];

const ID_FIELD: &str = "id";

/// Flattens a profile collection into entry descriptors, sampling at most
/// `sample_size` entries per (module, role) without replacement.
///
/// Identifier and excluded fields are dropped here, so the sample-pass
/// vocabulary (and everything derived from it) never contains them.
pub fn extract_sampled<R>(data: &Value, sample_size: usize, rng: &mut R) -> Vec<Entry>
where
	R: Rng + ?Sized,
{
	let mut entries = Vec::new();

	walk(data, &mut |module, role, role_data| {
		let amount = sample_size.min(role_data.len());

		for idx in rand::seq::index::sample(rng, role_data.len(), amount) {
			let Some(item) = role_data[idx].as_object() else {
				tracing::warn!(module, role, index = idx + 1, "Skipping non-mapping entry.");

				continue;
			};
			let fields = item
				.iter()
				.filter(|(name, _)| {
					*name != ID_FIELD && !EXCLUDED_FIELDS.contains(&name.to_lowercase().as_str())
				})
				.map(|(name, raw)| EntryField { name: name.clone(), value: value::classify(raw) })
				.collect();

			entries.push(Entry {
				module: module.to_string(),
				role: role.to_string(),
				entry_index: idx + 1,
				fields,
			});
		}
	});

	entries
}

/// Flattens every entry of the collection in original order, keeping only the
/// fields allowed for its (module, role).
///
/// Entries whose fields are all filtered away are retained with an empty field
/// set so index numbering stays stable; they contribute nothing to matching.
pub fn extract_full(data: &Value, allowed: &AllowedFieldSet) -> Vec<Entry> {
	let mut entries = Vec::new();

	walk(data, &mut |module, role, role_data| {
		let allowed_fields = allowed
			.get(module)
			.and_then(|roles| roles.get(role))
			.map(Vec::as_slice)
			.unwrap_or_default();

		for (idx, item) in role_data.iter().enumerate() {
			let Some(item) = item.as_object() else {
				tracing::warn!(module, role, index = idx + 1, "Skipping non-mapping entry.");

				continue;
			};

			entries.push(Entry {
				module: module.to_string(),
				role: role.to_string(),
				entry_index: idx + 1,
				fields: filter_fields(item, allowed_fields),
			});
		}
	});

	entries
}

fn filter_fields(item: &Map<String, Value>, allowed_fields: &[String]) -> Vec<EntryField> {
	item.iter()
		.filter(|(name, _)| allowed_fields.iter().any(|allowed| allowed == *name))
		.map(|(name, raw)| EntryField { name: name.clone(), value: value::classify(raw) })
		.collect()
}

/// Walks the nested collection shape, visiting each (module, role, entries)
/// branch and skipping malformed branches with a warning.
fn walk<F>(data: &Value, visit: &mut F)
where
	F: FnMut(&str, &str, &[Value]),
{
	match data {
		Value::Array(items) =>
			for item in items {
				if item.is_object() {
					walk(item, visit);
				} else {
					tracing::warn!("Skipping non-mapping collection document.");
				}
			},
		Value::Object(modules) =>
			for (module, roles_data) in modules {
				let Some(roles) = roles_data.as_object() else {
					tracing::warn!(module, "Skipping module without role mapping.");

					continue;
				};

				for (role, role_data) in roles {
					let Some(role_data) = role_data.as_array() else {
						tracing::warn!(module, role, "Skipping role without entry list.");

						continue;
					};

					visit(module, role, role_data);
				}
			},
		_ => tracing::warn!("Profile collection root must be a mapping or a document list."),
	}
}

#[cfg(test)]
mod tests {
	use rand::{SeedableRng, rngs::StdRng};
	use serde_json::json;

	use super::*;
	use crate::ValueClass;

	fn collection() -> Value {
		json!({
			"Sales": {
				"Rep": [
					{ "id": "r1", "Email": "rep@example.com", "pitch": "We sell widgets", "quota": 12 },
					{ "pitch": "Widgets at scale" },
					{ "pitch": "Enterprise widgets" }
				],
				"Lead": [
					{ "pitch": "Looking for widgets", "Name": "Alice" }
				]
			}
		})
	}

	#[test]
	fn sample_drops_identifier_and_excluded_fields() {
		let mut rng = StdRng::seed_from_u64(7);
		let entries = extract_sampled(&collection(), 10, &mut rng);
		let rep = entries
			.iter()
			.find(|entry| entry.role == "Rep" && entry.entry_index == 1)
			.expect("first Rep entry must be sampled");
		let names = rep.fields.iter().map(|field| field.name.as_str()).collect::<Vec<_>>();

		assert!(!names.contains(&"id"));
		assert!(!names.contains(&"Email"));
		assert!(names.contains(&"pitch"));
		assert!(names.contains(&"quota"));
	}

	#[test]
	fn sample_is_capped_at_role_size() {
		let mut rng = StdRng::seed_from_u64(7);
		let entries = extract_sampled(&collection(), 2, &mut rng);
		let reps = entries.iter().filter(|entry| entry.role == "Rep").count();
		let leads = entries.iter().filter(|entry| entry.role == "Lead").count();

		assert_eq!(reps, 2);
		assert_eq!(leads, 1);
	}

	#[test]
	fn sample_indices_are_positions_in_the_role_sequence() {
		let mut rng = StdRng::seed_from_u64(7);
		let entries = extract_sampled(&collection(), 10, &mut rng);
		let mut rep_indices =
			entries.iter().filter(|e| e.role == "Rep").map(|e| e.entry_index).collect::<Vec<_>>();

		rep_indices.sort_unstable();

		assert_eq!(rep_indices, vec![1, 2, 3]);
	}

	#[test]
	fn full_keeps_entries_without_allowed_fields() {
		let mut allowed = AllowedFieldSet::new();

		allowed
			.entry("Sales".to_string())
			.or_default()
			.insert("Rep".to_string(), vec!["quota".to_string()]);

		let entries = extract_full(&collection(), &allowed);
		let reps = entries.iter().filter(|entry| entry.role == "Rep").collect::<Vec<_>>();

		assert_eq!(reps.len(), 3);
		assert_eq!(reps[0].entry_index, 1);
		assert_eq!(reps[0].fields, vec![EntryField {
			name: "quota".to_string(),
			value: ValueClass::Numeric,
		}]);
		assert!(reps[1].fields.is_empty());
		assert!(reps[2].fields.is_empty());

		// Lead has no allowed fields at all.
		let lead = entries.iter().find(|entry| entry.role == "Lead").expect("Lead entry");

		assert!(lead.fields.is_empty());
	}

	#[test]
	fn malformed_branches_are_skipped() {
		let data = json!({
			"Sales": { "Rep": [{ "pitch": "ok" }], "Broken": "not a list" },
			"Broken": 42
		});
		let mut rng = StdRng::seed_from_u64(1);
		let entries = extract_sampled(&data, 5, &mut rng);

		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].module, "Sales");
	}

	#[test]
	fn document_lists_are_flattened() {
		let data = json!([collection(), "noise", collection()]);
		let mut rng = StdRng::seed_from_u64(3);
		let entries = extract_sampled(&data, 10, &mut rng);

		assert_eq!(entries.len(), 8);
	}
}
