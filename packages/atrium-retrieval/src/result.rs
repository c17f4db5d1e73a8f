use atrium_domain::Intent;

/// Which retrieval path produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
	Facts,
	Tables,
	Docs,
	DocsExpanded,
	OcrIlike,
	OcrTrgm,
	None,
}

impl Mode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Facts => "facts",
			Self::Tables => "tables",
			Self::Docs => "docs",
			Self::DocsExpanded => "docs_expanded",
			Self::OcrIlike => "ocr_ilike",
			Self::OcrTrgm => "ocr_trgm",
			Self::None => "none",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
	Fact,
	Table,
	Document,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EvidenceMeta {
	pub kind: EvidenceKind,
	pub source: Option<String>,
	pub page: Option<i32>,
	pub project_id: Option<i64>,
	pub section: Option<String>,
	pub tags: Option<String>,
}

/// Diagnostic trace of the orchestrator's decisions, attached only when the
/// caller asks for it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RetrievalTrace {
	pub intent: Intent,
	pub keyword_terms: Vec<String>,
	pub expanded_queries: Vec<String>,
	pub project_filter: Option<String>,
}

/// `answers`, `metas` and `scores` are parallel; their lengths always agree.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RetrievalResult {
	pub mode: Mode,
	pub answers: Vec<String>,
	pub metas: Vec<EvidenceMeta>,
	pub scores: Vec<f32>,
	pub trace: Option<RetrievalTrace>,
}

impl RetrievalResult {
	pub fn empty(mode: Mode) -> Self {
		Self { mode, answers: Vec::new(), metas: Vec::new(), scores: Vec::new(), trace: None }
	}

	pub fn is_empty(&self) -> bool {
		self.answers.is_empty()
	}
}

#[derive(Debug, Clone)]
pub struct RetrieveRequest {
	pub query: String,
	pub k: Option<u32>,
	pub overfetch: Option<u32>,
	pub project_id: Option<i64>,
	pub project_name: Option<String>,
	pub include_facts: bool,
	pub debug: bool,
}

impl RetrieveRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			k: None,
			overfetch: None,
			project_id: None,
			project_name: None,
			include_facts: true,
			debug: false,
		}
	}
}
