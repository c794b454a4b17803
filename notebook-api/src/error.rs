/// Error handling for the web server
///
/// Handlers return `ApiResult<T>`; the error side renders as a minimal HTML
/// page with the matching status code, or as a redirect to the login page.
///
/// Form validation failures are not errors in this sense: handlers collect
/// them in [`FieldErrors`] and re-render the form with HTTP 200.
///
/// # Example
///
/// ```no_run
/// use notebook_api::error::{ApiError, ApiResult};
/// use notebook_shared::models::note::Note;
/// use sqlx::SqlitePool;
///
/// async fn load(pool: &SqlitePool, pk: i64) -> ApiResult<Note> {
///     Note::find_by_id(pool, pk)
///         .await?
///         .ok_or_else(|| ApiError::NotFound(format!("No note matches id {}", pk)))
/// }
/// ```

use crate::{app::found, views};
use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use notebook_shared::auth::{
    middleware::AuthError, password::PasswordError, session::SessionTokenError,
};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified error type for request handlers
#[derive(Debug)]
pub enum ApiError {
    /// Form body could not be read at all (400)
    BadRequest(String),

    /// No valid login (302 to the login page, returning to `next`)
    LoginRequired { next: String },

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500); the message is logged, never shown
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::LoginRequired { next } => write!(f, "Login required for {}", next),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::LoginRequired { next } => found(&login_url(&next)),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Html(views::error_page("Bad Request", &msg)),
            )
                .into_response(),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Html(views::error_page("Not Found", &msg)),
            )
                .into_response(),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::error_page("Server Error", "An internal error occurred.")),
                )
                    .into_response()
            }
        }
    }
}

/// Login page URL that returns to `next` afterwards
pub fn login_url(next: &str) -> String {
    format!("/login/?next={}", encode_query_value(next))
}

/// Percent-encodes a query value, leaving `/` readable
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert rejected form bodies to API errors
///
/// Covers a wrong content type and bodies that do not parse as a form;
/// missing or invalid fields are not rejections.
impl From<FormRejection> for ApiError {
    fn from(err: FormRejection) -> Self {
        tracing::debug!(error = %err, "Form body rejected");
        ApiError::BadRequest(err.body_text())
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session token errors to API errors
///
/// Only reached when signing a new token fails; invalid incoming tokens are
/// handled by the login guard.
impl From<SessionTokenError> for ApiError {
    fn from(err: SessionTokenError) -> Self {
        ApiError::InternalError(format!("Session token operation failed: {}", err))
    }
}

/// Convert authentication errors for the request at `next`
pub fn auth_error(err: AuthError, next: &str) -> ApiError {
    match err {
        AuthError::Database(e) => ApiError::from(e),
        _ => ApiError::LoginRequired {
            next: next.to_string(),
        },
    }
}

/// Field-level form errors, shown inline next to each input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error to one field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Adds an error about the form as a whole
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// Errors for one field, in the order they were added
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Errors not tied to a field
    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// Names of the fields that have errors
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = FieldErrors::new();

        for (field, errors) in errors.field_errors() {
            let field = field.to_string();
            for error in errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Enter a valid value.".to_string());
                field_errors.add(&field, message);
            }
        }

        field_errors
    }
}
