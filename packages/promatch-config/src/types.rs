use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub collections: Collections,
	pub providers: Providers,
	#[serde(default)]
	pub matching: Matching,
	#[serde(default)]
	pub output: Output,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

/// Record store collection names: where source profiles are read from and
/// where match results are written.
#[derive(Debug, Deserialize)]
pub struct Collections {
	pub source: String,
	pub matches: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	/// Model used for values below the long-text cutoff.
	pub short: EmbeddingProviderConfig,
	/// Model used when both values are at or above the cutoff.
	pub long: EmbeddingProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_embedding_path")]
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Matching {
	pub threshold: f32,
	pub sample_size: usize,
	pub top_fields: usize,
	pub bucket_count: usize,
	pub long_text_cutoff: usize,
	pub workers: usize,
	pub seed: Option<u64>,
}
impl Default for Matching {
	fn default() -> Self {
		Self {
			threshold: 0.6,
			sample_size: 5,
			top_fields: 5,
			bucket_count: 6,
			long_text_cutoff: 150,
			workers: 4,
			seed: None,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Output {
	pub sample_scores_path: PathBuf,
	pub buckets_path: PathBuf,
}
impl Default for Output {
	fn default() -> Self {
		Self {
			sample_scores_path: PathBuf::from("sample_similarity.json"),
			buckets_path: PathBuf::from("match_buckets.json"),
		}
	}
}

fn default_embedding_path() -> String {
	"/embeddings".to_string()
}

fn default_timeout_ms() -> u64 {
	30_000
}
