/// Note and post pages
///
/// One set of handlers serves both record kinds; each handler is generic
/// over a [`Resource`] and instantiated per kind by the router.
///
/// # Endpoints (notes; posts are the same under `/posts/`)
///
/// - `GET  /`                 - List the requester's notes
/// - `GET  /note/:pk/`        - Show a note
/// - `GET  /note/new/`        - Empty form
/// - `POST /note/new/`        - Create a note
/// - `GET  /note/:pk/edit/`   - Pre-filled form
/// - `POST /note/:pk/edit/`   - Save an edit
/// - `GET  /note/:pk/delete/` - Confirmation page
/// - `POST /note/:pk/delete/` - Delete
///
/// Records are fetched by primary key alone: any logged-in user can open,
/// edit or delete any record whose key they know.

use crate::{
    app::{found, AppState},
    error::{ApiError, ApiResult},
    forms::{Form, RecordForm},
    resources::Resource,
    views,
};
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use notebook_shared::{
    auth::middleware::AuthContext,
    models::record::{CreateRecord, Record, UpdateRecord},
};

/// Item routes for one record kind: detail, new, edit and delete
pub fn item_routes<E: Resource>() -> Router<AppState> {
    let prefix = E::ITEM_PREFIX;

    Router::new()
        .route(&format!("{prefix}new/"), get(new_form::<E>).post(create::<E>))
        .route(&format!("{prefix}:pk/"), get(detail::<E>))
        .route(&format!("{prefix}:pk/edit/"), get(edit_form::<E>).post(update::<E>))
        .route(
            &format!("{prefix}:pk/delete/"),
            get(delete_confirm::<E>).post(delete::<E>),
        )
}

/// Parses a primary key from the URL; anything but an integer is a 404
fn parse_pk<E: Resource>(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::NotFound(format!("No {} matches id {}", E::NAME, raw)))
}

async fn fetch<E: Resource>(state: &AppState, pk: i64) -> ApiResult<Record<E>> {
    Record::<E>::find_by_id(&state.db, pk)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No {} matches id {}", E::NAME, pk)))
}

/// List page
///
/// Notes list only the requester's own records; posts list everyone's.
pub async fn list<E: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Html<String>> {
    let records = Record::<E>::list_visible_to(&state.db, auth.user_id).await?;

    tracing::debug!(
        kind = E::NAME,
        user_id = auth.user_id,
        count = records.len(),
        "Listing records"
    );

    Ok(Html(views::record_list(&records, &auth.username)))
}

/// Detail page (404 if absent)
pub async fn detail<E: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pk): Path<String>,
) -> ApiResult<Html<String>> {
    let record = fetch::<E>(&state, parse_pk::<E>(&pk)?).await?;

    Ok(Html(views::record_detail(&record, &auth.username)))
}

/// Empty create form
pub async fn new_form<E: Resource>(Extension(auth): Extension<AuthContext>) -> Html<String> {
    let heading = format!("New {}", E::NAME);

    Html(views::record_form::<E>(
        &heading,
        &E::new_path(),
        &E::Form::default(),
        &Default::default(),
        &auth.username,
    ))
}

/// Create a record owned by the requester
///
/// Invalid input re-renders the form with field errors (HTTP 200).
pub async fn create<E: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(mut form): Form<E::Form>,
) -> ApiResult<Response> {
    if let Err(errors) = form.check() {
        let heading = format!("New {}", E::NAME);
        return Ok(Html(views::record_form::<E>(
            &heading,
            &E::new_path(),
            &form,
            &errors,
            &auth.username,
        ))
        .into_response());
    }

    let record = Record::<E>::create(
        &state.db,
        CreateRecord {
            title: form.title().to_string(),
            content: form.content().to_string(),
            author_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(
        kind = E::NAME,
        id = record.id,
        user_id = auth.user_id,
        "Record created"
    );

    Ok(found(&E::after_save_path(record.id)))
}

/// Edit form, pre-filled from the stored record (404 if absent)
pub async fn edit_form<E: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pk): Path<String>,
) -> ApiResult<Html<String>> {
    let record = fetch::<E>(&state, parse_pk::<E>(&pk)?).await?;
    let form = E::Form::from_values(&record.title, &record.content);
    let heading = format!("Edit {}", E::NAME);

    Ok(Html(views::record_form::<E>(
        &heading,
        &E::edit_path(record.id),
        &form,
        &Default::default(),
        &auth.username,
    )))
}

/// Save an edit
///
/// A missing record is a 404 even when the input is invalid. For kinds that
/// reassign owners, the requester becomes the owner.
pub async fn update<E: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pk): Path<String>,
    Form(mut form): Form<E::Form>,
) -> ApiResult<Response> {
    let record = fetch::<E>(&state, parse_pk::<E>(&pk)?).await?;

    if let Err(errors) = form.check() {
        let heading = format!("Edit {}", E::NAME);
        return Ok(Html(views::record_form::<E>(
            &heading,
            &E::edit_path(record.id),
            &form,
            &errors,
            &auth.username,
        ))
        .into_response());
    }

    let updated = Record::<E>::update(
        &state.db,
        record.id,
        UpdateRecord {
            title: form.title().to_string(),
            content: form.content().to_string(),
            editor_id: auth.user_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("No {} matches id {}", E::NAME, record.id)))?;

    tracing::info!(
        kind = E::NAME,
        id = updated.id,
        user_id = auth.user_id,
        previous_owner = record.author_id,
        owner = updated.author_id,
        "Record updated"
    );

    Ok(found(&E::after_save_path(updated.id)))
}

/// Delete confirmation page (404 if absent)
pub async fn delete_confirm<E: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pk): Path<String>,
) -> ApiResult<Html<String>> {
    let record = fetch::<E>(&state, parse_pk::<E>(&pk)?).await?;

    Ok(Html(views::record_confirm_delete(&record, &auth.username)))
}

/// Delete unconditionally and return to the list (404 if absent)
pub async fn delete<E: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pk): Path<String>,
) -> ApiResult<Response> {
    let pk = parse_pk::<E>(&pk)?;

    if !Record::<E>::delete(&state.db, pk).await? {
        return Err(ApiError::NotFound(format!("No {} matches id {}", E::NAME, pk)));
    }

    tracing::info!(kind = E::NAME, id = pk, user_id = auth.user_id, "Record deleted");

    Ok(found(E::LIST_PATH))
}
