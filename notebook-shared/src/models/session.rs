/// Login session model and database operations
///
/// Every successful login creates one row. The browser holds a signed token
/// naming the row (see [`crate::auth::session`]); logging out deletes the row,
/// which invalidates the token immediately even though it has not expired.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id BLOB PRIMARY KEY NOT NULL,
///     user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL,
///     expires_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// A server-side login session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Random session ID (UUID v4)
    pub id: Uuid,

    /// Logged-in user
    pub user_id: i64,

    /// When the user logged in
    pub created_at: DateTime<Utc>,

    /// After this instant the session is no longer honoured
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns true if the session has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Starts a session for `user_id` lasting `ttl`
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        ttl: Duration,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(now)
        .bind(now + ttl)
        .fetch_one(pool)
        .await
    }

    /// Finds a session that exists and has not expired
    pub async fn find_active(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, created_at, expires_at
            FROM sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(session.filter(|s| !s.is_expired()))
    }

    /// Ends a session
    ///
    /// # Returns
    ///
    /// True if the session existed
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every expired session
    ///
    /// # Returns
    ///
    /// Number of sessions removed
    pub async fn delete_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: 1,
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn test_session_not_expired() {
        assert!(!session(Duration::hours(1)).is_expired());
    }

    #[test]
    fn test_session_expired() {
        assert!(session(Duration::seconds(-1)).is_expired());
    }
}
