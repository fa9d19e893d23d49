/// Schema for the record store: source profile documents, persisted match
/// results, and the per-sink selected-count document.
pub fn render_schema() -> &'static str {
	"\
CREATE TABLE IF NOT EXISTS profile_records (
	record_id BIGSERIAL PRIMARY KEY,
	collection TEXT NOT NULL,
	doc JSONB NOT NULL,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS idx_profile_records_collection
	ON profile_records (collection, record_id);
CREATE TABLE IF NOT EXISTS match_results (
	result_id BIGSERIAL PRIMARY KEY,
	sink TEXT NOT NULL,
	doc JSONB NOT NULL,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS idx_match_results_sink
	ON match_results (sink, result_id);
CREATE TABLE IF NOT EXISTS match_counts (
	sink TEXT PRIMARY KEY,
	selected_count BIGINT NOT NULL,
	updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"
}
