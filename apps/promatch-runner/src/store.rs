use serde_json::Value;

use promatch_domain::MatchResult;
use promatch_engine::{BoxFuture, RecordStore, VectorSink};
use promatch_storage::{db::Db, qdrant::QdrantStore};

/// [`RecordStore`] reading profiles from, and writing results to, Postgres.
pub struct PgRecordStore {
	db: Db,
	source: String,
	sink: String,
}
impl PgRecordStore {
	pub fn new(db: Db, source: String, sink: String) -> Self {
		Self { db, source, sink }
	}
}
impl RecordStore for PgRecordStore {
	fn fetch_all<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async move { Ok(self.db.fetch_collection(&self.source).await?) })
	}

	fn persist<'a>(&'a self, results: &'a [MatchResult]) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			let docs =
				results.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>()?;

			Ok(self.db.insert_results(&self.sink, &docs).await?)
		})
	}

	fn persist_count<'a>(&'a self, selected: usize) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move { Ok(self.db.upsert_count(&self.sink, i64::try_from(selected)?).await?) })
	}
}

/// [`VectorSink`] forwarding long-text match embeddings to Qdrant.
pub struct QdrantVectorSink {
	store: QdrantStore,
}
impl QdrantVectorSink {
	pub fn new(store: QdrantStore) -> Self {
		Self { store }
	}
}
impl VectorSink for QdrantVectorSink {
	fn upsert_pair<'a>(
		&'a self,
		text1: &'a str,
		vector1: &'a [f32],
		text2: &'a str,
		vector2: &'a [f32],
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move { Ok(self.store.upsert_pair(text1, vector1, text2, vector2).await?) })
	}
}
