/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use notebook_api::{app::AppState, config::Config};
/// use notebook_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(pool, config);
/// let app = notebook_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::{auth_error, ApiError},
    routes,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use axum_extra::extract::CookieJar;
use notebook_shared::{
    auth::middleware::authenticate,
    models::{note::NoteKind, post::PostKind},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Name of the login session cookie
pub const SESSION_COOKIE: &str = "sessionid";

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the secret used to sign session cookies
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                  # Health check (public, JSON)
/// ├── /register/  /login/      # Account pages (public)
/// ├── /logout/                 # Any method (public)
/// ├── /  /accounts/profile     # Note list (login required)
/// ├── /note/...                # Note detail/new/edit/delete (login required)
/// └── /posts/...               # Post list/detail/new/edit/delete (login required)
/// ```
///
/// # Middleware Stack
///
/// 1. Login guard (protected routes only)
/// 2. Logging (tower-http TraceLayer)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/register/",
            get(routes::auth::register_form).post(routes::auth::register),
        )
        .route(
            "/login/",
            get(routes::auth::login_form).post(routes::auth::login),
        )
        .route("/logout/", any(routes::auth::logout));

    let protected_routes = Router::new()
        .route("/", get(routes::records::list::<NoteKind>))
        .route("/accounts/profile", get(routes::records::list::<NoteKind>))
        .merge(routes::records::item_routes::<NoteKind>())
        .route("/posts/", get(routes::records::list::<PostKind>))
        .merge(routes::records::item_routes::<PostKind>())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            login_required,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Login guard
///
/// Resolves the `sessionid` cookie into an `AuthContext` and injects it into
/// request extensions. Requests without a live session are redirected to the
/// login page before the handler runs.
async fn login_required(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_default();

    match authenticate(&state.db, state.session_secret(), &token).await {
        Ok(auth) => {
            tracing::debug!(user_id = auth.user_id, path = %path, "Request authenticated");
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, path = %path, "Login required");
            auth_error(e, &path).into_response()
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound("The requested page does not exist.".to_string())
}

/// 302 redirect to `location`
///
/// `axum::response::Redirect::to` answers 303; form posts here answer 302.
pub fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(location, "Refusing to redirect to an invalid location");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
