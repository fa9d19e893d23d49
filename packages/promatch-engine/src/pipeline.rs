use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};

use promatch_domain::{
	AllowedFieldSet, BucketMap, MatchResult,
	bucket::bucket_by_module,
	extract::{extract_full, extract_sampled},
	keyselect::select_top_fields,
};

use crate::{EmbeddingProvider, Error, RecordStore, Result, Scorer, VectorSink, matcher};

/// Tuning knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct MatchSettings {
	pub threshold: f32,
	pub sample_size: usize,
	pub top_fields: usize,
	pub bucket_count: usize,
	pub long_text_cutoff: usize,
	pub workers: usize,
	pub seed: Option<u64>,
}
impl From<&promatch_config::Matching> for MatchSettings {
	fn from(cfg: &promatch_config::Matching) -> Self {
		Self {
			threshold: cfg.threshold,
			sample_size: cfg.sample_size,
			top_fields: cfg.top_fields,
			bucket_count: cfg.bucket_count,
			long_text_cutoff: cfg.long_text_cutoff,
			workers: cfg.workers,
			seed: cfg.seed,
		}
	}
}

/// Everything a full run produced, for reporting and persistence.
pub struct RunReport {
	pub sample_results: Vec<MatchResult>,
	pub allowed: AllowedFieldSet,
	pub results: Vec<MatchResult>,
	pub buckets: BucketMap,
	pub failed_tasks: usize,
}

/// The two-pass matching pipeline: a sampled vocabulary pass selects the
/// fields worth comparing, then the full pass scores every qualifying pair of
/// the whole collection.
pub struct MatchPipeline {
	pub settings: MatchSettings,
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub records: Arc<dyn RecordStore>,
	pub vectors: Arc<dyn VectorSink>,
}
impl MatchPipeline {
	pub async fn run(&self) -> Result<RunReport> {
		let data = self
			.records
			.fetch_all()
			.await
			.map_err(|err| Error::Storage { message: err.to_string() })?;
		let mut rng = match self.settings.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};
		let sampled = extract_sampled(&data, self.settings.sample_size, &mut rng);

		tracing::info!(entries = sampled.len(), "Sample pass starting.");

		// Each pass gets its own scorer. The sample cache holds vectors of
		// fields the full pass may never see again, so it is not carried over.
		let scorer = Arc::new(Scorer::new(self.embedding.clone(), self.settings.long_text_cutoff));
		let sample = matcher::run_pass(
			sampled,
			scorer,
			self.settings.threshold,
			self.settings.workers,
			None,
		)
		.await;
		let allowed = select_top_fields(&sample.results, self.settings.top_fields);

		tracing::info!(
			sample_matches = sample.results.len(),
			modules = allowed.len(),
			"Sample pass finished."
		);

		let full_entries = extract_full(&data, &allowed);

		tracing::info!(entries = full_entries.len(), "Full pass starting.");

		let scorer = Arc::new(Scorer::new(self.embedding.clone(), self.settings.long_text_cutoff));
		let full = matcher::run_pass(
			full_entries,
			scorer,
			self.settings.threshold,
			self.settings.workers,
			Some(self.vectors.clone()),
		)
		.await;

		tracing::info!(
			matches = full.results.len(),
			failed_tasks = sample.failed_tasks + full.failed_tasks,
			"Full pass finished."
		);

		// Persistence failures keep the run alive; the report still carries
		// every result for the caller to write out.
		if let Err(err) = self.records.persist(&full.results).await {
			tracing::error!("Failed to persist match results: {err}.");
		}
		if let Err(err) = self.records.persist_count(full.results.len()).await {
			tracing::error!("Failed to persist match count: {err}.");
		}

		let buckets = bucket_by_module(full.results.clone(), self.settings.bucket_count);

		Ok(RunReport {
			sample_results: sample.results,
			allowed,
			results: full.results,
			buckets,
			failed_tasks: sample.failed_tasks + full.failed_tasks,
		})
	}
}
