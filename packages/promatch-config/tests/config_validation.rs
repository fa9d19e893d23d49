use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use promatch_config::Error;

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn with_matching(key: &str, value: Value) -> String {
	let mut root = sample_value();
	let table = root.as_table_mut().expect("Sample config must be a table.");
	let matching = table
		.get_mut("matching")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [matching].");

	matching.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render config.")
}

fn write_temp_config(payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let mut path = env::temp_dir();

	path.push(format!("promatch_config_{}_{nanos}_{ordinal}.toml", std::process::id()));
	fs::write(&path, payload).expect("Failed to write temp config.");

	path
}

fn load(payload: &str) -> promatch_config::Result<promatch_config::Config> {
	let path = write_temp_config(payload);
	let result = promatch_config::load(&path);

	let _ = fs::remove_file(&path);

	result
}

#[test]
fn loads_sample_config() {
	let cfg = load(SAMPLE_CONFIG_TOML).expect("Sample config must load.");

	assert_eq!(cfg.matching.threshold, 0.6);
	assert_eq!(cfg.matching.workers, 4);
	assert_eq!(cfg.collections.matches, "user_match_out");
	assert_eq!(cfg.providers.long.dimensions, 384);
}

#[test]
fn matching_section_is_optional() {
	let mut root = sample_value();

	root.as_table_mut().expect("table").remove("matching");
	root.as_table_mut().expect("table").remove("output");

	let payload = toml::to_string(&root).expect("Failed to render config.");
	let cfg = load(&payload).expect("Config without [matching] must load.");

	assert_eq!(cfg.matching.threshold, 0.6);
	assert_eq!(cfg.matching.sample_size, 5);
	assert_eq!(cfg.matching.top_fields, 5);
	assert_eq!(cfg.matching.bucket_count, 6);
	assert_eq!(cfg.matching.long_text_cutoff, 150);
	assert_eq!(cfg.matching.workers, 4);
	assert_eq!(cfg.matching.seed, None);
	assert_eq!(cfg.output.buckets_path, PathBuf::from("match_buckets.json"));
}

#[test]
fn missing_storage_is_a_parse_error() {
	let mut root = sample_value();

	root.as_table_mut().expect("table").remove("storage");

	let payload = toml::to_string(&root).expect("Failed to render config.");

	assert!(matches!(load(&payload), Err(Error::ParseConfig { .. })));
}

#[test]
fn rejects_negative_threshold() {
	let payload = with_matching("threshold", Value::Float(-0.1));

	assert!(matches!(load(&payload), Err(Error::Validation { .. })));
}

#[test]
fn rejects_zero_workers() {
	let payload = with_matching("workers", Value::Integer(0));

	assert!(matches!(load(&payload), Err(Error::Validation { .. })));
}

#[test]
fn rejects_zero_bucket_count() {
	let payload = with_matching("bucket_count", Value::Integer(0));

	assert!(matches!(load(&payload), Err(Error::Validation { .. })));
}

#[test]
fn rejects_empty_api_key() {
	let mut root = sample_value();
	let short = root
		.as_table_mut()
		.expect("table")
		.get_mut("providers")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers].")
		.get_mut("short")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers.short].");

	short.insert("api_key".to_string(), Value::String(" ".to_string()));

	let payload = toml::to_string(&root).expect("Failed to render config.");

	assert!(matches!(load(&payload), Err(Error::Validation { .. })));
}

#[test]
fn rejects_long_dimensions_mismatching_vector_dim() {
	let mut root = sample_value();
	let long = root
		.as_table_mut()
		.expect("table")
		.get_mut("providers")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers].")
		.get_mut("long")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers.long].");

	long.insert("dimensions".to_string(), Value::Integer(512));

	let payload = toml::to_string(&root).expect("Failed to render config.");

	assert!(matches!(load(&payload), Err(Error::Validation { .. })));
}

#[test]
fn defaults_empty_provider_path() {
	let mut root = sample_value();
	let short = root
		.as_table_mut()
		.expect("table")
		.get_mut("providers")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers].")
		.get_mut("short")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers.short].");

	short.insert("path".to_string(), Value::String("  ".to_string()));

	let payload = toml::to_string(&root).expect("Failed to render config.");
	let cfg = load(&payload).expect("Config must load.");

	assert_eq!(cfg.providers.short.path, "/embeddings");
}
