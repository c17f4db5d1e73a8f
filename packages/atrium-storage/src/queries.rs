use pgvector::Vector;

use crate::{
	Error, Result,
	db::Db,
	models::{ChunkHit, FactHit, PageHit, ProjectAliasRow, TableHit},
};

/// Dense top-k over curated facts. Facts without an embedding are skipped;
/// they can only be reached by key out-of-band.
pub async fn search_facts(
	db: &Db,
	query: Vector,
	project_id: Option<i64>,
	k: i64,
) -> Result<Vec<FactHit>> {
	sqlx::query_as(
		"\
SELECT
	project_id,
	key,
	value,
	source_page,
	(1 - (embedding <=> $1))::float4 AS similarity
FROM facts
WHERE embedding IS NOT NULL
	AND ($2::bigint IS NULL OR project_id = $2)
ORDER BY embedding <=> $1
LIMIT $3",
	)
	.bind(query)
	.bind(project_id)
	.bind(k)
	.fetch_all(&db.pool)
	.await
	.map_err(Error::from_query)
}

/// Dense top-k over extracted tables, optionally pinned to one type label.
pub async fn search_tables(
	db: &Db,
	query: Vector,
	project_id: Option<i64>,
	table_type: Option<&str>,
	k: i64,
) -> Result<Vec<TableHit>> {
	sqlx::query_as(
		"\
SELECT
	id,
	project_id,
	source_path,
	page,
	table_type,
	summary,
	markdown_content,
	(1 - (embedding <=> $1))::float4 AS similarity
FROM document_tables
WHERE embedding IS NOT NULL
	AND ($2::bigint IS NULL OR project_id = $2)
	AND ($3::text IS NULL OR table_type = $3)
ORDER BY embedding <=> $1
LIMIT $4",
	)
	.bind(query)
	.bind(project_id)
	.bind(table_type)
	.bind(k)
	.fetch_all(&db.pool)
	.await
	.map_err(Error::from_query)
}

pub async fn search_chunks(
	db: &Db,
	query: Vector,
	project_id: Option<i64>,
	k: i64,
) -> Result<Vec<ChunkHit>> {
	sqlx::query_as(
		"\
SELECT
	id,
	project_id,
	source,
	page,
	section,
	tags,
	content,
	(1 - (embedding <=> $1))::float4 AS similarity
FROM doc_chunks
WHERE embedding IS NOT NULL
	AND ($2::bigint IS NULL OR project_id = $2)
ORDER BY embedding <=> $1
LIMIT $3",
	)
	.bind(query)
	.bind(project_id)
	.bind(k)
	.fetch_all(&db.pool)
	.await
	.map_err(Error::from_query)
}

/// Case-insensitive substring pass over OCR page text. `patterns` must
/// already be wrapped as `%term%`. The similarity column is a placeholder;
/// the caller rescoring by matched-term fraction owns the real score.
pub async fn search_pages_ilike(
	db: &Db,
	patterns: &[String],
	project_id: Option<i64>,
	k: i64,
) -> Result<Vec<PageHit>> {
	sqlx::query_as(
		"\
SELECT
	id,
	project_id,
	source,
	page,
	ocr_text,
	0::float4 AS similarity
FROM ocr_pages
WHERE ocr_text ILIKE ANY($1)
	AND ($2::bigint IS NULL OR project_id = $2)
LIMIT $3",
	)
	.bind(patterns)
	.bind(project_id)
	.bind(k)
	.fetch_all(&db.pool)
	.await
	.map_err(Error::from_query)
}

/// Trigram-ranked pass over OCR page text, the last-resort fallback when
/// the substring pass finds nothing.
pub async fn search_pages_trgm(
	db: &Db,
	query_text: &str,
	project_id: Option<i64>,
	k: i64,
) -> Result<Vec<PageHit>> {
	sqlx::query_as(
		"\
SELECT
	id,
	project_id,
	source,
	page,
	ocr_text,
	similarity(ocr_text, $1)::float4 AS similarity
FROM ocr_pages
WHERE ($2::bigint IS NULL OR project_id = $2)
ORDER BY similarity(ocr_text, $1) DESC
LIMIT $3",
	)
	.bind(query_text)
	.bind(project_id)
	.bind(k)
	.fetch_all(&db.pool)
	.await
	.map_err(Error::from_query)
}

/// Alias table plus every project name as its own alias, so a project is
/// always findable by its canonical name even with no curated aliases.
pub async fn project_aliases(db: &Db) -> Result<Vec<ProjectAliasRow>> {
	sqlx::query_as(
		"\
SELECT pa.alias AS alias, p.name AS canonical
FROM project_aliases pa
JOIN projects p ON p.id = pa.project_id
UNION
SELECT lower(name) AS alias, name AS canonical
FROM projects",
	)
	.fetch_all(&db.pool)
	.await
	.map_err(Error::from_query)
}

pub async fn project_id_by_name(db: &Db, name: &str) -> Result<Option<i64>> {
	let row: Option<(i64,)> =
		sqlx::query_as("SELECT id FROM projects WHERE lower(name) = lower($1) LIMIT 1")
			.bind(name)
			.fetch_optional(&db.pool)
			.await
			.map_err(Error::from_query)?;

	Ok(row.map(|(id,)| id))
}
