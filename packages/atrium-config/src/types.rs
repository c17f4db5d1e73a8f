use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub retrieval: Retrieval,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	#[serde(default = "default_pool_max_conns")]
	pub pool_max_conns: u32,
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub chat: Option<ChatProviderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_embedding_path")]
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatProviderConfig {
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_chat_path")]
	pub path: String,
	pub model: String,
	#[serde(default)]
	pub temperature: f32,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

/// Tuning knobs for the retrieval engine. The threshold defaults were tuned
/// empirically against a small brochure corpus and should be revalidated
/// before being relied on for a new corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct Retrieval {
	#[serde(default = "default_top_k")]
	pub top_k: u32,
	#[serde(default = "default_overfetch")]
	pub overfetch: u32,
	#[serde(default = "default_payment_overfetch")]
	pub payment_overfetch: u32,
	#[serde(default = "default_facts_threshold")]
	pub facts_threshold: f32,
	#[serde(default = "default_tables_threshold")]
	pub tables_threshold: f32,
	#[serde(default = "default_mmr_lambda")]
	pub mmr_lambda: f32,
	#[serde(default = "default_true")]
	pub facts_enabled: bool,
	#[serde(default = "default_true")]
	pub expansion_enabled: bool,
	/// Page span where brochures typically place payment schedules.
	#[serde(default = "default_payment_pages")]
	pub payment_pages: PageRange,
	#[serde(default = "default_granularity")]
	pub granularity: String,
	#[serde(default)]
	pub cache: Cache,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRange {
	pub min: i32,
	pub max: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cache {
	#[serde(default = "default_true")]
	pub enabled: bool,
	#[serde(default = "default_result_ttl_secs")]
	pub result_ttl_secs: u64,
	#[serde(default = "default_result_capacity")]
	pub result_capacity: u32,
	#[serde(default = "default_embedding_capacity")]
	pub embedding_capacity: u32,
}

impl Default for Cache {
	fn default() -> Self {
		Self {
			enabled: true,
			result_ttl_secs: default_result_ttl_secs(),
			result_capacity: default_result_capacity(),
			embedding_capacity: default_embedding_capacity(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_pool_max_conns() -> u32 {
	8
}

fn default_embedding_path() -> String {
	"/v1/embeddings".to_string()
}

fn default_chat_path() -> String {
	"/v1/chat/completions".to_string()
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_top_k() -> u32 {
	3
}

fn default_overfetch() -> u32 {
	48
}

fn default_payment_overfetch() -> u32 {
	96
}

fn default_facts_threshold() -> f32 {
	0.75
}

fn default_tables_threshold() -> f32 {
	0.45
}

fn default_mmr_lambda() -> f32 {
	0.75
}

fn default_true() -> bool {
	true
}

fn default_payment_pages() -> PageRange {
	PageRange { min: 8, max: 16 }
}

fn default_granularity() -> String {
	"page".to_string()
}

fn default_result_ttl_secs() -> u64 {
	300
}

fn default_result_capacity() -> u32 {
	100
}

fn default_embedding_capacity() -> u32 {
	1_000
}
