/// Password hashing and password policy
///
/// Hashing uses Argon2id. Parameters follow the OWASP minimum for Argon2id
/// (19 MiB memory, 2 passes, 1 lane), which keeps a login round trip well
/// under a second on commodity hardware.
///
/// # Example
///
/// ```
/// use notebook_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse battery")?;
///
/// assert!(verify_password("correct horse battery", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use std::sync::OnceLock;

/// Minimum password length, in characters
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Passwords rejected outright, compared case-insensitively
const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password12", "password123", "passw0rd", "12345678",
    "123456789", "1234567890", "87654321", "11111111", "00000000", "qwerty123",
    "qwertyuiop", "1q2w3e4r", "1qaz2wsx", "abcd1234", "abc12345", "iloveyou",
    "sunshine", "princess", "football", "baseball", "welcome1", "letmein1",
    "trustno1", "superman", "starwars", "whatever", "dragon12", "monkey12",
    "michael1", "computer", "internet", "admin123", "changeme", "qwerty12",
];

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with Argon2id and a random 16-byte salt
///
/// # Returns
///
/// PHC string format hash, e.g.
/// ```text
/// $argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(19456)
        .t_cost(2)
        .p_cost(1)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Parameters are read back from the PHC string, so hashes made with other
/// Argon2 settings still verify.
///
/// # Returns
///
/// `Ok(true)` if password matches, `Ok(false)` if it doesn't match
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Spends the same work as [`verify_password`] without a stored hash
///
/// Called when a login names an unknown user, so response time does not
/// reveal which usernames exist. The throwaway hash is made on first use.
pub fn verify_dummy_password(password: &str) {
    match dummy_hash() {
        Some(hash) => {
            let _ = verify_password(password, hash);
        }
        None => tracing::warn!("Could not create the dummy password hash"),
    }
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    DUMMY_HASH
        .get_or_init(|| hash_password("notebook-dummy-password").ok())
        .as_deref()
}

/// Checks a new password against the registration policy
///
/// Rules:
/// - at least 8 characters
/// - not made only of digits
/// - not a well-known common password
/// - not too similar to the username
///
/// # Returns
///
/// `Ok(())` if the password is acceptable, `Err` with a user-facing message if not
///
/// # Example
///
/// ```
/// use notebook_shared::auth::password::validate_password;
///
/// assert!(validate_password("Secret123!", "alice").is_ok());
/// assert!(validate_password("short", "alice").is_err());
/// assert!(validate_password("alice2024", "alice").is_err());
/// ```
pub fn validate_password(password: &str, username: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_CHARS
        ));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("This password is entirely numeric.".to_string());
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err("This password is too common.".to_string());
    }

    if is_too_similar(&lowered, &username.to_lowercase()) {
        return Err("The password is too similar to the username.".to_string());
    }

    Ok(())
}

/// Similarity between the password and the username
///
/// Uses the ratio of the longest common substring to the combined length,
/// doubled, so identical strings score 1.0. Anything at or above 0.7 is
/// rejected, as is a password that contains a username of 3+ characters,
/// however long the rest of the password is.
fn is_too_similar(password: &str, username: &str) -> bool {
    if username.chars().count() >= 3 && password.contains(username) {
        return true;
    }

    let a: Vec<char> = password.chars().collect();
    let b: Vec<char> = username.chars().collect();
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let longest = longest_common_substring(&a, &b);
    let ratio = 2.0 * longest as f64 / (a.len() + b.len()) as f64;
    ratio >= 0.7
}

fn longest_common_substring(a: &[char], b: &[char]) -> usize {
    let mut best = 0;
    let mut previous = vec![0usize; b.len() + 1];

    for ca in a {
        let mut current = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                current[j + 1] = previous[j] + 1;
                best = best.max(current[j + 1]);
            }
        }
        previous = current;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_containing_username_is_rejected() {
        let err = validate_password("bobcat-Wonder-2024!", "bob").unwrap_err();
        assert!(err.contains("too similar"));

        assert!(validate_password("Wonder-2024-cat!", "bob").is_ok());
        assert!(validate_password("al-Wonder-2024!", "al").is_ok());
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=19456"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_verify_dummy_password_is_repeatable() {
        verify_dummy_password("anything");
        verify_dummy_password("notebook-dummy-password");

        let hash = dummy_hash().expect("Dummy hash should be created");
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("anything", hash).unwrap());
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password").expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password").expect("Hash should succeed");

        let result = verify_password("correct_password", &hash).expect("Verify should succeed");
        assert!(result, "Correct password should verify");
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_password").expect("Hash should succeed");

        let result = verify_password("wrong_password", &hash).expect("Verify should succeed");
        assert!(!result, "Wrong password should not verify");
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "invalid_hash").is_err());
        assert!(verify_password("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_validate_password_accepts_reasonable_passwords() {
        for password in ["Secret123!", "correct horse battery", "unrelated-words-9"] {
            assert!(
                validate_password(password, "alice").is_ok(),
                "Password '{}' should be valid",
                password
            );
        }
    }

    #[test]
    fn test_validate_password_too_short() {
        let err = validate_password("Sh0rt!", "alice").unwrap_err();
        assert!(err.contains("too short"));
    }

    #[test]
    fn test_validate_password_entirely_numeric() {
        let err = validate_password("90817263544", "alice").unwrap_err();
        assert!(err.contains("entirely numeric"));
    }

    #[test]
    fn test_validate_password_common() {
        let err = validate_password("Password123", "alice").unwrap_err();
        assert!(err.contains("too common"));
    }

    #[test]
    fn test_validate_password_similar_to_username() {
        let err = validate_password("alice2024", "alice").unwrap_err();
        assert!(err.contains("similar"));

        let err = validate_password("testuserx", "testuser").unwrap_err();
        assert!(err.contains("similar"));
    }

    #[test]
    fn test_longest_common_substring() {
        let a: Vec<char> = "abcdef".chars().collect();
        let b: Vec<char> = "zcdez".chars().collect();
        assert_eq!(longest_common_substring(&a, &b), 3);
    }
}
