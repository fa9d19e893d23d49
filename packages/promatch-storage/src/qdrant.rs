pub const PRIMARY_VECTOR_NAME: &str = "primary";
pub const SECONDARY_VECTOR_NAME: &str = "secondary";

// std
use std::collections::HashMap;
// crates.io
use qdrant_client::{
	Payload,
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, Vector,
		VectorParamsBuilder, VectorsConfigBuilder,
	},
};
use uuid::Uuid;
// self
use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &promatch_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the match collection when absent. Both named vectors share the
	/// configured dimension and use cosine distance.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(());
		}

		let mut vectors_config = VectorsConfigBuilder::default();

		for name in [PRIMARY_VECTOR_NAME, SECONDARY_VECTOR_NAME] {
			vectors_config.add_named_vector_params(
				name,
				VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine),
			);
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone())
					.vectors_config(vectors_config),
			)
			.await?;

		Ok(())
	}

	/// Stores a scored pair of texts with their embeddings. The point id is
	/// derived from both texts so re-running a match overwrites the previous
	/// point instead of duplicating it.
	pub async fn upsert_pair(
		&self,
		text1: &str,
		vector1: &[f32],
		text2: &str,
		vector2: &[f32],
	) -> Result<()> {
		let mut payload = Payload::new();

		payload.insert("text1", text1);
		payload.insert("text2", text2);

		let mut vectors = HashMap::new();

		vectors.insert(PRIMARY_VECTOR_NAME.to_string(), Vector::from(vector1.to_vec()));
		vectors.insert(SECONDARY_VECTOR_NAME.to_string(), Vector::from(vector2.to_vec()));

		let key = format!("{text1}\u{1f}{text2}");

		self.upsert(point_id(key.as_bytes()), vectors, payload).await
	}

	async fn upsert(
		&self,
		id: String,
		vectors: HashMap<String, Vector>,
		payload: Payload,
	) -> Result<()> {
		let point = PointStruct::new(id, vectors, payload);

		self.client
			.upsert_points(
				UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true),
			)
			.await?;

		Ok(())
	}
}

fn point_id(key: &[u8]) -> String {
	Uuid::new_v5(&Uuid::NAMESPACE_OID, key).to_string()
}
