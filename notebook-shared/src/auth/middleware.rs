/// Request authentication
///
/// Resolves the value of a `sessionid` cookie into an [`AuthContext`]. The
/// token signature and expiry are checked first; then the session row and
/// the user it points at must both still exist.
///
/// The HTTP layer wraps [`authenticate`] in a login guard and inserts the
/// resulting context into request extensions.
///
/// # Example
///
/// ```no_run
/// use notebook_shared::auth::middleware::{authenticate, AuthContext};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, token: &str) {
/// match authenticate(&pool, "session-secret", token).await {
///     Ok(auth) => println!("Hello, {}!", auth.username),
///     Err(e) => println!("Not logged in: {}", e),
/// }
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::session::{validate_token, SessionTokenError};
use crate::models::{session::Session, user::User};

/// Authentication context added to request extensions
///
/// Handlers extract it with axum's `Extension<AuthContext>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Authenticated username
    pub username: String,

    /// Session the request belongs to
    pub session_id: Uuid,
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session cookie was sent
    #[error("Missing credentials")]
    MissingCredentials,

    /// Token signature, issuer or expiry check failed
    #[error("Invalid session token: {0}")]
    InvalidToken(#[from] SessionTokenError),

    /// Session row is gone or expired (e.g. after logout)
    #[error("Session has ended")]
    SessionEnded,

    /// Session outlived its user
    #[error("User no longer exists")]
    UnknownUser,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// True for errors caused by the client's credentials rather than the server
    pub fn is_credential_error(&self) -> bool {
        !matches!(self, AuthError::Database(_))
    }
}

/// Resolves a session token into an authentication context
///
/// # Errors
///
/// - `MissingCredentials` for an empty token
/// - `InvalidToken` if the token fails validation
/// - `SessionEnded` if the session row was deleted or has expired
/// - `UnknownUser` if the session's user no longer exists
/// - `Database` if a lookup fails
pub async fn authenticate(
    pool: &SqlitePool,
    secret: &str,
    token: &str,
) -> Result<AuthContext, AuthError> {
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let claims = validate_token(token, secret)?;

    let session = Session::find_active(pool, claims.sid)
        .await?
        .ok_or(AuthError::SessionEnded)?;

    // A token can only name its own user's session
    if session.user_id != claims.sub {
        return Err(AuthError::SessionEnded);
    }

    let user = User::find_by_id(pool, session.user_id)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    Ok(AuthContext {
        user_id: user.id,
        username: user.username,
        session_id: session.id,
    })
}
