use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use promatch_config::EmbeddingProviderConfig;

use crate::{Error, Result};

/// HTTP client for one OpenAI-style `/embeddings` endpoint. The engine holds
/// one of these per configured model (short-text and long-text).
pub struct EmbeddingClient {
	client: Client,
	url: String,
	model: String,
	dimensions: u32,
}
impl EmbeddingClient {
	pub fn new(cfg: &EmbeddingProviderConfig) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.build()?;

		Ok(Self {
			client,
			url: format!("{}{}", cfg.api_base, cfg.path),
			model: cfg.model.clone(),
			dimensions: cfg.dimensions,
		})
	}

	/// Embeds a single text. Callers must be able to share the client across
	/// concurrent tasks; `reqwest::Client` is internally synchronized.
	pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
		let body = serde_json::json!({
			"model": self.model,
			"input": [text],
			"dimensions": self.dimensions,
		});
		let res = self.client.post(&self.url).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;
		let mut vectors = parse_response(json)?;

		if vectors.is_empty() {
			return Err(Error::InvalidResponse {
				message: "Embedding response contains no vectors.".to_string(),
			});
		}

		let vector = vectors.swap_remove(0);

		if vector.len() != self.dimensions as usize {
			return Err(Error::InvalidResponse {
				message: format!(
					"Embedding dimension {} does not match configured dimensions {}.",
					vector.len(),
					self.dimensions
				),
			});
		}

		Ok(vector)
	}
}

/// Parses a `{"data": [{"index": .., "embedding": [..]}]}` response body,
/// returning vectors in index order.
fn parse_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json.get("data").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse { message: "Embedding response is missing data array.".to_string() }
	})?;
	let mut indexed = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item.get("embedding").and_then(|v| v.as_array()).ok_or_else(|| {
			Error::InvalidResponse { message: "Embedding item missing embedding array.".to_string() }
		})?;
		let mut vec = Vec::with_capacity(embedding.len());

		for value in embedding {
			let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
				message: "Embedding value must be numeric.".to_string(),
			})?;

			vec.push(number as f32);
		}

		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_embeddings_in_index_order() {
		let json = serde_json::json!({
			"data": [
				{ "index": 1, "embedding": [2.0, 3.0] },
				{ "index": 0, "embedding": [0.5, 1.5] }
			]
		});
		let parsed = parse_response(json).expect("parse failed");

		assert_eq!(parsed, vec![vec![0.5, 1.5], vec![2.0, 3.0]]);
	}

	#[test]
	fn rejects_missing_data_array() {
		let json = serde_json::json!({ "error": "rate limited" });

		assert!(matches!(parse_response(json), Err(Error::InvalidResponse { .. })));
	}

	#[test]
	fn rejects_non_numeric_components() {
		let json = serde_json::json!({
			"data": [{ "index": 0, "embedding": [0.5, "oops"] }]
		});

		assert!(matches!(parse_response(json), Err(Error::InvalidResponse { .. })));
	}
}
