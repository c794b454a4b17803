/// Database models for the notebook
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Registered accounts
/// - `session`: Server-side login sessions
/// - `record`: Generic owned title/content records
/// - `note`: Private notes (a `record` kind)
/// - `post`: Public posts (a `record` kind)
/// - `author`: Named authors (stored, not yet routed)
///
/// # Example
///
/// ```no_run
/// use notebook_shared::models::note::Note;
/// use notebook_shared::models::record::CreateRecord;
/// use notebook_shared::models::user::{User, CreateUser};
/// use notebook_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     email: String::new(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let note = Note::create(&pool, CreateRecord {
///     title: "First".to_string(),
///     content: "Hello".to_string(),
///     author_id: user.id,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod author;
pub mod note;
pub mod post;
pub mod record;
pub mod session;
pub mod user;
