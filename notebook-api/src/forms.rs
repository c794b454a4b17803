/// HTML form bodies
///
/// Forms are posted as `application/x-www-form-urlencoded`. Every field
/// defaults to empty when absent, so a missing field surfaces as a
/// "required" error on the re-rendered form rather than as a rejected request.
/// Values are trimmed before validation; whitespace-only input counts as
/// missing.

use crate::error::{ApiError, FieldErrors};
use axum::extract::FromRequest;
use notebook_shared::models::{
    note::NoteKind,
    post::PostKind,
    record::OwnedEntity,
    user::{is_valid_username, USERNAME_MAX_CHARS},
};
use serde::{de::DeserializeOwned, Deserialize};
use validator::{Validate, ValidateEmail, ValidationError};

pub const REQUIRED: &str = "This field is required.";

/// `axum::Form` whose rejection renders as an [`ApiError`] page
#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(axum::Form), rejection(ApiError))]
pub struct Form<T>(pub T);

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(REQUIRED.into());
        return Err(error);
    }
    Ok(())
}

/// Error message for a value longer than `limit` characters
pub fn too_long_message(limit: usize) -> String {
    format!("Ensure this value has at most {} characters.", limit)
}

fn valid_username(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if value.chars().count() > USERNAME_MAX_CHARS {
        let mut error = ValidationError::new("max_length");
        error.message = Some(too_long_message(USERNAME_MAX_CHARS).into());
        return Err(error);
    }
    if !is_valid_username(value) {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some(
            "Enter a valid username. This value may contain only letters, numbers, \
             and @/./+/-/_ characters."
                .into(),
        );
        return Err(error);
    }
    Ok(())
}

fn email_address(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if !value.to_string().validate_email() {
        let mut error = ValidationError::new("email");
        error.message = Some("Enter a valid email address.".into());
        return Err(error);
    }
    Ok(())
}

/// Form shape shared by notes and posts
///
/// The title limit comes from the record kind the form saves into.
pub trait RecordForm: Validate + DeserializeOwned + Default + Send + 'static {
    type Kind: OwnedEntity;

    fn title(&self) -> &str;
    fn content(&self) -> &str;

    /// Pre-fills the form from a stored record
    fn from_values(title: &str, content: &str) -> Self;

    /// Trims every value in place
    fn normalize(&mut self);

    /// Normalizes, then validates
    fn check(&mut self) -> Result<(), FieldErrors> {
        self.normalize();

        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        let limit = Self::Kind::TITLE_MAX_CHARS;
        if self.title().chars().count() > limit {
            errors.add("title", too_long_message(limit));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Note create/edit form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NoteForm {
    #[validate(custom(function = "required"))]
    pub title: String,

    #[validate(custom(function = "required"))]
    pub content: String,
}

/// Post create/edit form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(custom(function = "required"))]
    pub title: String,

    #[validate(custom(function = "required"))]
    pub content: String,
}

macro_rules! impl_record_form {
    ($form:ty, $kind:ty) => {
        impl RecordForm for $form {
            type Kind = $kind;

            fn title(&self) -> &str {
                &self.title
            }

            fn content(&self) -> &str {
                &self.content
            }

            fn from_values(title: &str, content: &str) -> Self {
                Self {
                    title: title.to_string(),
                    content: content.to_string(),
                }
            }

            fn normalize(&mut self) {
                self.title = self.title.trim().to_string();
                self.content = self.content.trim().to_string();
            }
        }
    };
}

impl_record_form!(NoteForm, NoteKind);
impl_record_form!(PostForm, PostKind);

/// Registration form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(custom(function = "valid_username"))]
    pub username: String,

    #[validate(custom(function = "email_address"))]
    pub email: String,

    #[validate(custom(function = "required"))]
    pub password1: String,

    #[validate(custom(function = "required"))]
    pub password2: String,
}

impl RegisterForm {
    /// Trims username and email; passwords are kept verbatim
    pub fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();
    }
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(custom(function = "required"))]
    pub username: String,

    #[validate(custom(function = "required"))]
    pub password: String,

    /// Where to go after logging in
    pub next: String,
}

impl LoginForm {
    pub fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
    }
}
