use serde_json::Value;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &promatch_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let lock_id: i64 = 7_760_113;
		// Advisory locks are held per connection. Run the whole bootstrap in
		// one transaction so the lock is scoped to a single connection and
		// released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in schema::render_schema().split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	/// Returns every document of a named source collection as a JSON array,
	/// in insertion order.
	pub async fn fetch_collection(&self, collection: &str) -> Result<Value> {
		let docs: Vec<(Value,)> = sqlx::query_as(
			"SELECT doc FROM profile_records WHERE collection = $1 ORDER BY record_id",
		)
		.bind(collection)
		.fetch_all(&self.pool)
		.await?;

		Ok(Value::Array(docs.into_iter().map(|(doc,)| doc).collect()))
	}

	pub async fn insert_profile(&self, collection: &str, doc: &Value) -> Result<()> {
		sqlx::query("INSERT INTO profile_records (collection, doc) VALUES ($1, $2)")
			.bind(collection)
			.bind(doc)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	/// Inserts one row per match result document under the given sink name.
	/// Concurrent writers for the same sink are fine; rows are append-only.
	pub async fn insert_results(&self, sink: &str, docs: &[Value]) -> Result<()> {
		if docs.is_empty() {
			return Ok(());
		}

		let mut tx = self.pool.begin().await?;

		for doc in docs {
			sqlx::query("INSERT INTO match_results (sink, doc) VALUES ($1, $2)")
				.bind(sink)
				.bind(doc)
				.execute(&mut *tx)
				.await?;
		}

		tx.commit().await?;

		Ok(())
	}

	pub async fn upsert_count(&self, sink: &str, selected_count: i64) -> Result<()> {
		sqlx::query(
			"\
INSERT INTO match_counts (sink, selected_count, updated_at)
VALUES ($1, $2, now())
ON CONFLICT (sink)
DO UPDATE SET selected_count = EXCLUDED.selected_count, updated_at = now()",
		)
		.bind(sink)
		.bind(selected_count)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	pub async fn fetch_results(&self, sink: &str) -> Result<Vec<Value>> {
		let docs: Vec<(Value,)> = sqlx::query_as(
			"SELECT doc FROM match_results WHERE sink = $1 ORDER BY result_id",
		)
		.bind(sink)
		.fetch_all(&self.pool)
		.await?;

		Ok(docs.into_iter().map(|(doc,)| doc).collect())
	}
}
