/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the registration password policy
/// - [`session`]: signed session tokens carried in the `sessionid` cookie
/// - [`middleware`]: resolving a session token into an [`middleware::AuthContext`]
///
/// # Example
///
/// ```no_run
/// use notebook_shared::auth::password::{hash_password, verify_password};
/// use notebook_shared::auth::session::{create_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(1, Uuid::new_v4(), Duration::hours(1));
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod middleware;
pub mod password;
pub mod session;
