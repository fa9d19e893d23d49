use std::{sync::Arc, time::Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod report;
pub mod store;

use promatch_engine::{DefaultEmbedding, MatchPipeline};
use promatch_storage::{db::Db, qdrant::QdrantStore};
use store::{PgRecordStore, QdrantVectorSink};

#[derive(Debug, Parser)]
#[command(
	version = promatch_cli::VERSION,
	rename_all = "kebab",
	styles = promatch_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = promatch_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let started = Instant::now();
	let db = Db::connect(&config.storage.postgres).await?;
	db.ensure_schema().await?;

	let qdrant = QdrantStore::new(&config.storage.qdrant)?;
	qdrant.ensure_collection().await?;

	let embedding = Arc::new(DefaultEmbedding::new(&config.providers)?);
	let records = Arc::new(PgRecordStore::new(
		db,
		config.collections.source.clone(),
		config.collections.matches.clone(),
	));
	let vectors = Arc::new(QdrantVectorSink::new(qdrant));
	let pipeline = MatchPipeline {
		settings: (&config.matching).into(),
		embedding,
		records,
		vectors,
	};
	let outcome = pipeline.run().await?;

	report::write_scores(&config.output.sample_scores_path, &outcome.sample_results)?;
	report::append_count(&config.output.sample_scores_path, outcome.results.len())?;
	report::write_buckets(&config.output.buckets_path, &outcome.buckets)?;

	if outcome.failed_tasks > 0 {
		tracing::warn!(
			failed_tasks = outcome.failed_tasks,
			"Run finished but some match tasks failed."
		);
	}

	tracing::info!(
		matches = outcome.results.len(),
		elapsed = ?started.elapsed(),
		"Match run finished."
	);

	Ok(())
}
