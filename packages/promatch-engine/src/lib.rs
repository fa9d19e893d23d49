pub mod matcher;
pub mod pipeline;
pub mod scorer;

mod error;

pub use error::Error;
pub use matcher::{PassOutcome, run_pass};
pub use pipeline::{MatchPipeline, MatchSettings, RunReport};
pub use scorer::{ScoredPair, Scorer};

use std::{future::Future, pin::Pin};

use serde_json::Value;

use promatch_domain::MatchResult;
use promatch_providers::embedding::EmbeddingClient;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Embedding backends, one model per text class.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed_short<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;

	fn embed_long<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

/// Source of profile documents and destination for match results.
pub trait RecordStore
where
	Self: Send + Sync,
{
	fn fetch_all<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Value>>;

	fn persist<'a>(&'a self, results: &'a [MatchResult]) -> BoxFuture<'a, color_eyre::Result<()>>;

	fn persist_count<'a>(&'a self, selected: usize) -> BoxFuture<'a, color_eyre::Result<()>>;
}

/// Destination for the embeddings of qualifying long-text matches.
pub trait VectorSink
where
	Self: Send + Sync,
{
	fn upsert_pair<'a>(
		&'a self,
		text1: &'a str,
		vector1: &'a [f32],
		text2: &'a str,
		vector2: &'a [f32],
	) -> BoxFuture<'a, color_eyre::Result<()>>;
}

/// [`EmbeddingProvider`] backed by the two configured HTTP models.
pub struct DefaultEmbedding {
	short: EmbeddingClient,
	long: EmbeddingClient,
}
impl DefaultEmbedding {
	pub fn new(cfg: &promatch_config::Providers) -> promatch_providers::Result<Self> {
		Ok(Self { short: EmbeddingClient::new(&cfg.short)?, long: EmbeddingClient::new(&cfg.long)? })
	}
}
impl EmbeddingProvider for DefaultEmbedding {
	fn embed_short<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move { Ok(self.short.embed(text).await?) })
	}

	fn embed_long<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move { Ok(self.long.embed(text).await?) })
	}
}
