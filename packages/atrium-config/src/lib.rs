mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, ChatProviderConfig, Config, EmbeddingProviderConfig, PageRange, Postgres, Providers,
	Retrieval, Service, Storage,
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

pub fn normalize(cfg: &mut Config) {
	cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();
	cfg.retrieval.granularity = cfg.retrieval.granularity.trim().to_lowercase();
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.postgres.dsn.is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	// Mixed dimensionalities between the embedding provider and the stored
	// vectors are a fatal configuration error, not a per-query condition.
	if cfg.providers.embedding.dimensions != cfg.storage.postgres.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.postgres.vector_dim."
				.to_string(),
		});
	}

	let retrieval = &cfg.retrieval;

	if retrieval.top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.top_k must be greater than zero.".to_string(),
		});
	}
	if retrieval.overfetch < retrieval.top_k {
		return Err(Error::Validation {
			message: "retrieval.overfetch must be at least retrieval.top_k.".to_string(),
		});
	}
	if retrieval.payment_overfetch < retrieval.overfetch {
		return Err(Error::Validation {
			message: "retrieval.payment_overfetch must be at least retrieval.overfetch."
				.to_string(),
		});
	}
	if !(0.0..=1.0).contains(&retrieval.facts_threshold) {
		return Err(Error::Validation {
			message: "retrieval.facts_threshold must be within [0.0, 1.0].".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&retrieval.tables_threshold) {
		return Err(Error::Validation {
			message: "retrieval.tables_threshold must be within [0.0, 1.0].".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&retrieval.mmr_lambda) {
		return Err(Error::Validation {
			message: "retrieval.mmr_lambda must be within [0.0, 1.0].".to_string(),
		});
	}
	if retrieval.payment_pages.min > retrieval.payment_pages.max {
		return Err(Error::Validation {
			message: "retrieval.payment_pages.min must not exceed retrieval.payment_pages.max."
				.to_string(),
		});
	}
	if !matches!(retrieval.granularity.as_str(), "page" | "paragraph") {
		return Err(Error::Validation {
			message: "retrieval.granularity must be one of page or paragraph.".to_string(),
		});
	}
	if retrieval.cache.enabled && retrieval.cache.result_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "retrieval.cache.result_ttl_secs must be greater than zero.".to_string(),
		});
	}
	if retrieval.cache.enabled && retrieval.cache.result_capacity == 0 {
		return Err(Error::Validation {
			message: "retrieval.cache.result_capacity must be greater than zero.".to_string(),
		});
	}

	Ok(())
}
