use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use promatch_domain::TextClass;

use crate::EmbeddingProvider;

/// A scored pair of texts, with the embeddings that produced the score.
pub struct ScoredPair {
	pub score: f32,
	pub text_class: TextClass,
	pub vector1: Arc<Vec<f32>>,
	pub vector2: Arc<Vec<f32>>,
}

/// Routes text pairs to the short or long embedding model and scores them by
/// cosine similarity.
///
/// Embeddings are cached per text for the lifetime of the scorer, so a value
/// appearing in many pairs is embedded once per pass. Provider failures and
/// degenerate vectors skip the pair instead of aborting the pass.
pub struct Scorer {
	provider: Arc<dyn EmbeddingProvider>,
	cache: Mutex<HashMap<String, Arc<Vec<f32>>>>,
	long_text_cutoff: usize,
}
impl Scorer {
	pub fn new(provider: Arc<dyn EmbeddingProvider>, long_text_cutoff: usize) -> Self {
		Self { provider, cache: Mutex::new(HashMap::new()), long_text_cutoff }
	}

	/// Scores a pair, or returns `None` when the pair is not comparable: the
	/// texts fall in different length classes, an embedding request failed, or
	/// the vectors do not admit a finite cosine.
	pub async fn score(&self, text1: &str, text2: &str) -> Option<ScoredPair> {
		let class = self.classify(text1);

		if class != self.classify(text2) {
			return None;
		}

		let vector1 = self.embed_cached(text1, class).await?;
		let vector2 = self.embed_cached(text2, class).await?;
		let score = cosine(&vector1, &vector2)?;

		Some(ScoredPair { score, text_class: class, vector1, vector2 })
	}

	fn classify(&self, text: &str) -> TextClass {
		if text.chars().count() < self.long_text_cutoff { TextClass::Short } else { TextClass::Long }
	}

	async fn embed_cached(&self, text: &str, class: TextClass) -> Option<Arc<Vec<f32>>> {
		{
			let cache = self.cache.lock().unwrap_or_else(|err| err.into_inner());

			if let Some(hit) = cache.get(text) {
				return Some(hit.clone());
			}
		}

		// The lock is never held across the request, so concurrent tasks may
		// race to embed the same text. The duplicate work is bounded by the
		// worker count and both writes store the same value.
		let request = match class {
			TextClass::Short => self.provider.embed_short(text),
			TextClass::Long => self.provider.embed_long(text),
		};
		let vector = match request.await {
			Ok(vector) => vector,
			Err(err) => {
				tracing::warn!(text_class = ?class, "Embedding request failed: {err}.");

				return None;
			},
		};

		if vector.iter().any(|component| !component.is_finite()) {
			tracing::warn!(text_class = ?class, "Embedding contains non-finite components.");

			return None;
		}

		let vector = Arc::new(vector);
		let mut cache = self.cache.lock().unwrap_or_else(|err| err.into_inner());

		cache.insert(text.to_string(), vector.clone());

		Some(vector)
	}
}

/// Cosine similarity clamped to `[0, 1]`. Mismatched dimensions and zero-norm
/// vectors yield `None`.
fn cosine(a: &[f32], b: &[f32]) -> Option<f32> {
	if a.len() != b.len() || a.is_empty() {
		return None;
	}

	let mut dot = 0.0_f64;
	let mut norm_a = 0.0_f64;
	let mut norm_b = 0.0_f64;

	for (x, y) in a.iter().zip(b) {
		dot += f64::from(*x) * f64::from(*y);
		norm_a += f64::from(*x) * f64::from(*x);
		norm_b += f64::from(*y) * f64::from(*y);
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return None;
	}

	let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());

	if !similarity.is_finite() {
		return None;
	}

	Some((similarity as f32).clamp(0.0, 1.0))
}
