/// Account pages
///
/// # Endpoints
///
/// - `GET  /register/` - Registration form
/// - `POST /register/` - Create an account, then go to the login page
/// - `GET  /login/`    - Login form (carries `?next=`)
/// - `POST /login/`    - Start a session and set the `sessionid` cookie
/// - `ANY  /logout/`   - End the session and clear the cookie

use crate::{
    app::{found, AppState, SESSION_COOKIE},
    error::{ApiResult, FieldErrors},
    forms::{Form, LoginForm, RegisterForm},
    views,
};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use notebook_shared::{
    auth::{
        middleware::authenticate,
        password,
        session::{create_token, Claims},
    },
    models::{
        session::Session,
        user::{CreateUser, User},
    },
};
use serde::Deserialize;
use validator::Validate;

pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Query string of the login page
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: String,
}

/// Returns `next` if it is a path on this site, otherwise `/`
pub fn safe_next(next: &str) -> &str {
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control);

    if local {
        next
    } else {
        "/"
    }
}

/// Registration form
pub async fn register_form() -> Html<String> {
    Html(views::register_page("", "", &FieldErrors::new()))
}

/// Create an account
///
/// Checks, in order: field rules, password confirmation, password policy and
/// username uniqueness. Any failure re-renders the form with HTTP 200.
pub async fn register(
    State(state): State<AppState>,
    Form(mut form): Form<RegisterForm>,
) -> ApiResult<Response> {
    form.normalize();

    let mut errors = match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    if !form.password1.is_empty() && !form.password2.is_empty() {
        if form.password1 != form.password2 {
            errors.add("password2", PASSWORD_MISMATCH);
        } else if let Err(message) = password::validate_password(&form.password2, &form.username)
        {
            // Stricter than a pure similarity ratio: any password containing a
            // username of 3+ characters is refused, e.g. "bobcat-Wonder-2024!" for "bob".
            errors.add("password2", message);
        }
    }

    if errors.field("username").is_empty()
        && User::find_by_username(&state.db, &form.username)
            .await?
            .is_some()
    {
        errors.add("username", DUPLICATE_USERNAME);
    }

    if !errors.is_empty() {
        return Ok(render_register(&form, &errors));
    }

    let password_hash = password::hash_password(&form.password1)?;

    let created = User::create(
        &state.db,
        CreateUser {
            username: form.username.clone(),
            email: form.email.clone(),
            password_hash,
        },
    )
    .await;

    let user = match created {
        Ok(user) => user,
        // Lost a race with another registration for the same name
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            errors.add("username", DUPLICATE_USERNAME);
            return Ok(render_register(&form, &errors));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(found("/login/"))
}

fn render_register(form: &RegisterForm, errors: &FieldErrors) -> Response {
    Html(views::register_page(&form.username, &form.email, errors)).into_response()
}

/// Login form
pub async fn login_form(Query(query): Query<NextQuery>) -> Html<String> {
    Html(views::login_page("", &query.next, &FieldErrors::new()))
}

/// Check credentials and start a session
///
/// Unknown users and wrong passwords get the same message and cost the same
/// Argon2 verification.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(mut form): Form<LoginForm>,
) -> ApiResult<Response> {
    form.normalize();

    if let Err(e) = form.validate() {
        let errors = FieldErrors::from(e);
        return Ok(render_login(&form, &errors));
    }

    let user = match User::find_by_username(&state.db, &form.username).await? {
        Some(user) if password::verify_password(&form.password, &user.password_hash)? => user,
        found_user => {
            if found_user.is_none() {
                password::verify_dummy_password(&form.password);
            }
            tracing::warn!(username = %form.username, "Failed login attempt");
            let mut errors = FieldErrors::new();
            errors.add_non_field(INVALID_LOGIN);
            return Ok(render_login(&form, &errors));
        }
    };

    let session_config = &state.config.session;
    let session = Session::create(&state.db, user.id, session_config.ttl()).await?;
    let claims = Claims::new(user.id, session.id, session_config.ttl());
    let token = create_token(&claims, state.session_secret())?;

    User::update_last_login(&state.db, user.id).await?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(session_config.cookie_secure)
        .build();

    tracing::info!(user_id = user.id, session_id = %session.id, "User logged in");

    Ok((jar.add(cookie), found(safe_next(&form.next))).into_response())
}

fn render_login(form: &LoginForm, errors: &FieldErrors) -> Response {
    Html(views::login_page(&form.username, &form.next, errors)).into_response()
}

/// End the session, whatever state it is in
///
/// Always clears the cookie and redirects to the login page.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match authenticate(&state.db, state.session_secret(), cookie.value()).await {
            Ok(auth) => {
                Session::delete(&state.db, auth.session_id).await?;
                tracing::info!(user_id = auth.user_id, "User logged out");
            }
            Err(e) if e.is_credential_error() => {
                tracing::debug!(error = %e, "Logout without a live session");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve session on logout");
            }
        }
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    Ok((jar, found("/login/")).into_response())
}
