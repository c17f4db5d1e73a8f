use atrium_storage::{
	db::Db,
	models::{ChunkHit, FactHit, PageHit, ProjectAliasRow, TableHit},
	queries,
};
use pgvector::Vector;

use crate::BoxFuture;

/// The storage operations retrieval needs, one method per query. `Db` is the
/// production implementation; tests substitute an in-memory corpus.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn search_facts<'a>(
		&'a self,
		query: Vector,
		project_id: Option<i64>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<FactHit>>>;

	fn search_tables<'a>(
		&'a self,
		query: Vector,
		project_id: Option<i64>,
		table_type: Option<&'a str>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<TableHit>>>;

	fn search_chunks<'a>(
		&'a self,
		query: Vector,
		project_id: Option<i64>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<ChunkHit>>>;

	fn search_pages_ilike<'a>(
		&'a self,
		patterns: &'a [String],
		project_id: Option<i64>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<PageHit>>>;

	fn search_pages_trgm<'a>(
		&'a self,
		query_text: &'a str,
		project_id: Option<i64>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<PageHit>>>;

	fn project_aliases<'a>(&'a self) -> BoxFuture<'a, atrium_storage::Result<Vec<ProjectAliasRow>>>;

	fn project_id_by_name<'a>(
		&'a self,
		name: &'a str,
	) -> BoxFuture<'a, atrium_storage::Result<Option<i64>>>;
}

impl SearchBackend for Db {
	fn search_facts<'a>(
		&'a self,
		query: Vector,
		project_id: Option<i64>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<FactHit>>> {
		Box::pin(queries::search_facts(self, query, project_id, k))
	}

	fn search_tables<'a>(
		&'a self,
		query: Vector,
		project_id: Option<i64>,
		table_type: Option<&'a str>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<TableHit>>> {
		Box::pin(queries::search_tables(self, query, project_id, table_type, k))
	}

	fn search_chunks<'a>(
		&'a self,
		query: Vector,
		project_id: Option<i64>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<ChunkHit>>> {
		Box::pin(queries::search_chunks(self, query, project_id, k))
	}

	fn search_pages_ilike<'a>(
		&'a self,
		patterns: &'a [String],
		project_id: Option<i64>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<PageHit>>> {
		Box::pin(queries::search_pages_ilike(self, patterns, project_id, k))
	}

	fn search_pages_trgm<'a>(
		&'a self,
		query_text: &'a str,
		project_id: Option<i64>,
		k: i64,
	) -> BoxFuture<'a, atrium_storage::Result<Vec<PageHit>>> {
		Box::pin(queries::search_pages_trgm(self, query_text, project_id, k))
	}

	fn project_aliases<'a>(&'a self) -> BoxFuture<'a, atrium_storage::Result<Vec<ProjectAliasRow>>> {
		Box::pin(queries::project_aliases(self))
	}

	fn project_id_by_name<'a>(
		&'a self,
		name: &'a str,
	) -> BoxFuture<'a, atrium_storage::Result<Option<i64>>> {
		Box::pin(queries::project_id_by_name(self, name))
	}
}
