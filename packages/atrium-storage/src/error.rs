#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("missing relation or column: {message}")]
	MissingRelation { message: String },
}

impl Error {
	/// Maps a query failure, promoting undefined-table (42P01) and
	/// undefined-column (42703) errors to `MissingRelation` so callers can
	/// degrade instead of failing the whole retrieval.
	pub fn from_query(err: sqlx::Error) -> Self {
		if let sqlx::Error::Database(db_err) = &err
			&& matches!(db_err.code().as_deref(), Some("42P01") | Some("42703"))
		{
			return Self::MissingRelation { message: db_err.message().to_string() };
		}

		Self::Sqlx(err)
	}

	/// Partial-data errors are absorbable; anything else means the store
	/// itself is broken and must surface to the caller.
	pub fn is_partial(&self) -> bool {
		matches!(self, Self::MissingRelation { .. })
	}
}
