/// Author model
///
/// A named author record. Nothing in the web layer references it and notes
/// are owned by users, not authors; the table exists so the data model stays
/// complete.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Maximum author name length, in characters
pub const AUTHOR_NAME_MAX_CHARS: usize = 150;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

impl Author {
    pub async fn create(pool: &SqlitePool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Author>("INSERT INTO authors (name) VALUES (?) RETURNING id, name")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(pool)
            .await
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
