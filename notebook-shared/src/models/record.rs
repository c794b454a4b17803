/// Owned text records: the storage shared by notes and posts
///
/// Notes and posts have the same shape (title, content, owner, timestamps) and
/// the same operations. They differ only in a handful of settings, carried by
/// a zero-sized kind type implementing [`OwnedEntity`]:
///
/// | Setting | Note | Post |
/// |---|---|---|
/// | table | `notes` | `posts` |
/// | title limit | 150 chars | 100 chars |
/// | list scope | owner only | everyone |
/// | owner on update | reassigned to requester | kept |
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     content TEXT NOT NULL,
///     author_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL,
///     modified_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notebook_shared::models::note::Note;
/// use notebook_shared::models::record::CreateRecord;
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
/// let note = Note::create(&pool, CreateRecord {
///     title: "Groceries".to_string(),
///     content: "Milk, eggs".to_string(),
///     author_id: user_id,
/// }).await?;
///
/// let mine = Note::list_visible_to(&pool, user_id).await?;
/// assert!(mine.iter().any(|n| n.id == note.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqlitePool};
use std::{fmt, marker::PhantomData};

const COLUMNS: &str = "id, title, content, author_id, created_at, modified_at";

/// Which records a list request may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Only records owned by the requester
    Owner,

    /// Every record, regardless of owner
    All,
}

/// Per-kind configuration of an owned record
pub trait OwnedEntity: fmt::Debug + Clone + Send + Sync + Unpin + 'static {
    /// Backing table
    const TABLE: &'static str;

    /// Maximum title length, in characters
    const TITLE_MAX_CHARS: usize;

    /// Records returned by [`Record::list_visible_to`]
    const LIST_SCOPE: ListScope;

    /// Whether saving an edit makes the editor the owner
    const REASSIGN_OWNER_ON_UPDATE: bool;
}

/// A titled text record owned by one user
#[derive(Debug, Clone, Serialize)]
pub struct Record<E> {
    /// Auto-assigned primary key
    pub id: i64,

    /// Title, at most `E::TITLE_MAX_CHARS` characters
    pub title: String,

    /// Body text
    pub content: String,

    /// Owning user
    pub author_id: i64,

    /// Set once, when the record is created
    pub created_at: DateTime<Utc>,

    /// Rewritten on every save
    pub modified_at: DateTime<Utc>,

    #[serde(skip)]
    kind: PhantomData<fn() -> E>,
}

/// Input for creating a record
#[derive(Debug, Clone)]
pub struct CreateRecord {
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// Input for saving an edit to a record
#[derive(Debug, Clone)]
pub struct UpdateRecord {
    pub title: String,
    pub content: String,

    /// User saving the edit; becomes the owner when the kind reassigns owners
    pub editor_id: i64,
}

impl<'r, E: OwnedEntity> FromRow<'r, SqliteRow> for Record<E> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            author_id: row.try_get("author_id")?,
            created_at: row.try_get("created_at")?,
            modified_at: row.try_get("modified_at")?,
            kind: PhantomData,
        })
    }
}

impl<E: OwnedEntity> Record<E> {
    /// Returns true if `user_id` owns this record
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    /// Creates a record, stamping both timestamps with the current time
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key), the title
    /// breaks the table's length check, or the database fails.
    pub async fn create(pool: &SqlitePool, data: CreateRecord) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO {} (title, content, author_id, created_at, modified_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}",
            E::TABLE
        );

        sqlx::query_as::<_, Self>(&sql)
            .bind(data.title)
            .bind(data.content)
            .bind(data.author_id)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Finds a record by primary key
    ///
    /// Ownership is not checked; any caller may read any record.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = ?", E::TABLE);

        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists the records `requester_id` may see, according to `E::LIST_SCOPE`
    pub async fn list_visible_to(
        pool: &SqlitePool,
        requester_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match E::LIST_SCOPE {
            ListScope::Owner => Self::list_by_author(pool, requester_id).await,
            ListScope::All => Self::list_all(pool).await,
        }
    }

    /// Lists records owned by `author_id`, in insertion order
    pub async fn list_by_author(
        pool: &SqlitePool,
        author_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE author_id = ? ORDER BY id",
            E::TABLE
        );

        sqlx::query_as::<_, Self>(&sql)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Lists every record, in insertion order
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY id", E::TABLE);

        sqlx::query_as::<_, Self>(&sql).fetch_all(pool).await
    }

    /// Saves an edit: overwrites title and content and bumps `modified_at`
    ///
    /// When `E::REASSIGN_OWNER_ON_UPDATE` is set, the editor also becomes the
    /// owner, whoever owned the record before.
    ///
    /// # Returns
    ///
    /// The updated record, or None if no record has this ID
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateRecord,
    ) -> Result<Option<Self>, sqlx::Error> {
        let owner_clause = if E::REASSIGN_OWNER_ON_UPDATE {
            ", author_id = ?"
        } else {
            ""
        };
        let sql = format!(
            "UPDATE {} SET title = ?, content = ?, modified_at = ?{owner_clause} \
             WHERE id = ? RETURNING {COLUMNS}",
            E::TABLE
        );

        let mut query = sqlx::query_as::<_, Self>(&sql)
            .bind(data.title)
            .bind(data.content)
            .bind(Utc::now());

        if E::REASSIGN_OWNER_ON_UPDATE {
            query = query.bind(data.editor_id);
        }

        query.bind(id).fetch_optional(pool).await
    }

    /// Deletes a record by primary key
    ///
    /// # Returns
    ///
    /// True if a record was deleted, false if none had this ID
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);

        let result = sqlx::query(&sql).bind(id).execute(pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts records owned by `author_id`
    pub async fn count_by_author(pool: &SqlitePool, author_id: i64) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE author_id = ?", E::TABLE);

        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(author_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

impl<E> fmt::Display for Record<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{note::NoteKind, post::PostKind};

    fn record<E: OwnedEntity>(author_id: i64) -> Record<E> {
        let now = Utc::now();
        Record {
            id: 1,
            title: "Shopping".to_string(),
            content: "Milk".to_string(),
            author_id,
            created_at: now,
            modified_at: now,
            kind: PhantomData,
        }
    }

    #[test]
    fn test_is_owned_by() {
        let note = record::<NoteKind>(7);
        assert!(note.is_owned_by(7));
        assert!(!note.is_owned_by(8));
    }

    #[test]
    fn test_display_is_title() {
        let post = record::<PostKind>(1);
        assert_eq!(post.to_string(), "Shopping");
    }

    #[test]
    fn test_serialize_skips_kind() {
        let note = record::<NoteKind>(3);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["title"], "Shopping");
        assert_eq!(json["author_id"], 3);
        assert!(json.get("kind").is_none());
    }
}
