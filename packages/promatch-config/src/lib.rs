mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Collections, Config, EmbeddingProviderConfig, Matching, Output, Postgres, Providers, Qdrant,
	Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.vector_dim == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.vector_dim must be greater than zero.".to_string(),
		});
	}

	for (label, name) in
		[("collections.source", &cfg.collections.source), ("collections.matches", &cfg.collections.matches)]
	{
		if name.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	for (label, provider) in [("short", &cfg.providers.short), ("long", &cfg.providers.long)] {
		if provider.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
		if provider.dimensions == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} dimensions must be greater than zero."),
			});
		}
	}

	if cfg.providers.long.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.long.dimensions must match storage.qdrant.vector_dim.".to_string(),
		});
	}

	if !cfg.matching.threshold.is_finite() || cfg.matching.threshold < 0.0 {
		return Err(Error::Validation {
			message: "matching.threshold must be a finite number of zero or greater.".to_string(),
		});
	}

	for (label, value) in [
		("matching.sample_size", cfg.matching.sample_size),
		("matching.top_fields", cfg.matching.top_fields),
		("matching.bucket_count", cfg.matching.bucket_count),
		("matching.long_text_cutoff", cfg.matching.long_text_cutoff),
		("matching.workers", cfg.matching.workers),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for provider in [&mut cfg.providers.short, &mut cfg.providers.long] {
		if provider.path.trim().is_empty() {
			provider.path = "/embeddings".to_string();
		}
	}
}
