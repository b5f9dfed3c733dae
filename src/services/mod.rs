pub mod artist;
pub mod genre;
pub mod show;
pub mod venue;

use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{entity} {id} does not exist")]
    InvalidReference { entity: &'static str, id: i64 },
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One row of a venue or artist search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

/// Case-insensitive substring match on a single column.
/// An empty term leaves the query unfiltered.
pub fn apply_text_search<T, C>(
    query: sea_orm::Select<T>,
    column: C,
    search_term: &str,
) -> sea_orm::Select<T>
where
    T: EntityTrait,
    C: ColumnTrait,
{
    let search_term = search_term.trim();
    if search_term.is_empty() {
        return query;
    }

    // SQLite's LIKE is case-insensitive for ASCII characters by default
    let pattern = format!("%{}%", search_term);
    query.filter(column.like(&pattern))
}
