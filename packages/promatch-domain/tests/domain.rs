use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;

use promatch_domain::{
	MatchResult, MatchSide, TextClass, bucket::bucket_by_module, extract, keyselect,
};

fn side(module: &str, role: &str, field: &str) -> MatchSide {
	MatchSide {
		module: module.to_string(),
		role: role.to_string(),
		entry_index: 1,
		field: field.to_string(),
		value: "text".to_string(),
	}
}

#[test]
fn sample_vocabulary_bounds_the_full_pass() {
	let data = json!({
		"Sales": {
			"Rep": [
				{ "pitch": "We sell widgets", "region": "EMEA", "email": "x@example.com" },
				{ "pitch": "Widgets at scale", "region": "APAC" }
			],
			"Lead": [
				{ "needs": "widget supplier", "budget": "flexible" }
			]
		}
	});
	let mut rng = StdRng::seed_from_u64(11);
	let sampled = extract::extract_sampled(&data, 5, &mut rng);

	// Simulate a sample pass that matched pitch against needs.
	let results = vec![MatchResult {
		entry1: side("Sales", "Rep", "pitch"),
		entry2: side("Sales", "Lead", "needs"),
		score: 0.8,
		text_class: TextClass::Short,
	}];
	let allowed = keyselect::select_top_fields(&results, 5);

	for (module, roles) in &allowed {
		for (role, fields) in roles {
			for field in fields {
				// Every selected field must exist in the sampled vocabulary.
				assert!(
					sampled.iter().any(|entry| entry.module == *module
						&& entry.role == *role
						&& entry.fields.iter().any(|f| f.name == *field)),
					"field {field} not observed in sample pass"
				);
			}
		}
	}

	let full = extract::extract_full(&data, &allowed);
	let rep_fields = full
		.iter()
		.filter(|entry| entry.role == "Rep")
		.flat_map(|entry| entry.fields.iter().map(|f| f.name.as_str()))
		.collect::<Vec<_>>();

	assert_eq!(rep_fields, vec!["pitch", "pitch"]);
}

#[test]
fn bucket_map_serializes_to_the_documented_shape() {
	let results = vec![
		MatchResult {
			entry1: side("Sales", "Rep", "pitch"),
			entry2: side("Sales", "Lead", "needs"),
			// Exactly representable, so the JSON comparison below is exact.
			score: 0.75,
			text_class: TextClass::Short,
		},
		MatchResult {
			entry1: side("Sales", "Rep", "pitch"),
			entry2: side("Sales", "Lead", "budget"),
			score: 0.5,
			text_class: TextClass::Long,
		},
	];
	let buckets = bucket_by_module(results, 2);
	let encoded = serde_json::to_value(&buckets).expect("bucket map must serialize");

	assert_eq!(encoded["Sales"]["0"][0]["score"], json!(0.75));
	assert_eq!(encoded["Sales"]["0"][0]["text_class"], json!("short"));
	assert_eq!(encoded["Sales"]["1"][0]["text_class"], json!("long"));
}
