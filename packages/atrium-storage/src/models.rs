#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FactHit {
	pub project_id: i64,
	pub key: String,
	pub value: String,
	pub source_page: Option<String>,
	pub similarity: f32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TableHit {
	pub id: i64,
	pub project_id: Option<i64>,
	pub source_path: String,
	pub page: Option<i32>,
	pub table_type: String,
	pub summary: String,
	pub markdown_content: String,
	pub similarity: f32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChunkHit {
	pub id: i64,
	pub project_id: Option<i64>,
	pub source: String,
	pub page: Option<i32>,
	pub section: Option<String>,
	pub tags: Option<String>,
	pub content: String,
	pub similarity: f32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PageHit {
	pub id: i64,
	pub project_id: Option<i64>,
	pub source: String,
	pub page: Option<i32>,
	pub ocr_text: String,
	pub similarity: f32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectAliasRow {
	pub alias: String,
	pub canonical: String,
}
