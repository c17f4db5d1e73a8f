pub mod answer;
pub mod backend;
pub mod cache;
pub mod result;

mod retrieve;

use std::{future::Future, pin::Pin, sync::Arc};

use atrium_config::{ChatProviderConfig, Config, EmbeddingProviderConfig};
use atrium_providers::{chat, embedding};

pub use backend::SearchBackend;
pub use result::{
	EvidenceKind, EvidenceMeta, Mode, RetrievalResult, RetrievalTrace, RetrieveRequest,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("provider error: {message}")]
	Provider { message: String },
	#[error("storage error: {message}")]
	Storage { message: String },
}

impl From<atrium_providers::Error> for Error {
	fn from(err: atrium_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, atrium_providers::Result<Vec<Vec<f32>>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [chat::Message],
	) -> BoxFuture<'a, atrium_providers::Result<String>>;
}

struct HttpProviders;

impl EmbeddingProvider for HttpProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, atrium_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl ChatProvider for HttpProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [chat::Message],
	) -> BoxFuture<'a, atrium_providers::Result<String>> {
		Box::pin(chat::complete(cfg, messages))
	}
}

/// The retrieval engine. Owns its two caches; the backend and providers are
/// injected so tests can run against in-memory stands-ins.
pub struct RetrievalService {
	pub cfg: Config,
	pub backend: Arc<dyn SearchBackend>,
	pub embeddings: Arc<dyn EmbeddingProvider>,
	pub chat: Arc<dyn ChatProvider>,
	embedding_cache: cache::EmbeddingCache,
	results: cache::ResultCache,
}

impl RetrievalService {
	pub fn new(cfg: Config, backend: Arc<dyn SearchBackend>) -> Self {
		let providers = Arc::new(HttpProviders);

		Self::with_providers(cfg, backend, providers.clone(), providers)
	}

	pub fn with_providers(
		cfg: Config,
		backend: Arc<dyn SearchBackend>,
		embeddings: Arc<dyn EmbeddingProvider>,
		chat: Arc<dyn ChatProvider>,
	) -> Self {
		let cache_cfg = &cfg.retrieval.cache;
		let embedding_cache = cache::EmbeddingCache::new(cache_cfg.embedding_capacity as usize);
		let results = cache::ResultCache::new(
			cache_cfg.result_capacity as usize,
			std::time::Duration::from_secs(cache_cfg.result_ttl_secs),
		);

		Self { cfg, backend, embeddings, chat, embedding_cache, results }
	}
}
