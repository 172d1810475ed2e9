//! Birds API.
//!
//! Create and update take `multipart/form-data` with the bird fields and up
//! to the policy's limit of `images` parts.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::auth::ApiAdmin;
use crate::error::{AppError, AppResult};
use crate::file::{self, ImageBatch, MAX_FILE_SIZE, MAX_IMAGES, UploadPolicy};
use crate::flash::Level;
use crate::models::{Bird, BirdInput};
use crate::state::AppState;

use super::helpers::{flash_all_redirect, flash_redirect, parse_id};

pub const ADDED: &str = "Bird was Added Successfully";
pub const UPDATED: &str = "Bird was Updated Successfully";

/// Request body cap: a full batch of images plus form fields.
const BODY_LIMIT: usize = MAX_IMAGES * MAX_FILE_SIZE + 1024 * 1024;

/// Create the birds API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/birds", get(list_birds).post(create_bird))
        .route(
            "/api/birds/{id}",
            get(get_bird).post(update_bird).delete(delete_bird),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

/// A parsed bird form: text fields, accepted images, and rejected-image messages.
struct BirdForm {
    input: BirdInput,
    images: ImageBatch,
    upload_errors: Vec<String>,
}

async fn read_bird_form(multipart: &mut Multipart, policy: &UploadPolicy) -> AppResult<BirdForm> {
    let mut input = BirdInput::default();
    let mut images = ImageBatch::new(policy.clone());
    let mut upload_errors = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "malformed bird form");
                return Err(AppError::BadRequest("malformed multipart body".to_string()));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        if name == "images" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("failed to read image: {e}")))?;

            // Browsers send an empty part when no file was chosen.
            if filename.is_empty() && data.is_empty() {
                continue;
            }
            if let Err(e) = images.add(&filename, &content_type, data.to_vec()) {
                upload_errors.push(e.to_string());
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read field {name}: {e}")))?;
        match name.as_str() {
            "breed" => input.breed = value,
            "name" => input.name = Some(value),
            "price" => input.price = value,
            "description" => input.description = value,
            _ => {}
        }
    }

    upload_errors.dedup();
    Ok(BirdForm {
        input,
        images,
        upload_errors,
    })
}

async fn list_birds(State(state): State<AppState>) -> AppResult<Json<Vec<Bird>>> {
    Ok(Json(state.birds().find_all().await?))
}

async fn get_bird(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Bird>> {
    let bird = state
        .birds()
        .find_by_id(parse_id(&id)?)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(bird))
}

async fn create_bird(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    session: Session,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let form = read_bird_form(&mut multipart, state.upload_policy()).await?;

    let fields = match form.input.validate() {
        Ok(fields) if form.upload_errors.is_empty() => fields,
        Ok(_) => {
            return Ok(
                flash_all_redirect(&session, Level::Danger, form.upload_errors, "/admin-panel")
                    .await,
            );
        }
        Err(errors) => {
            let mut messages = errors.into_messages();
            messages.extend(form.upload_errors);
            return Ok(flash_all_redirect(&session, Level::Danger, messages, "/admin-panel").await);
        }
    };

    let uris = file::store_batch(state.files(), form.images).await?;
    let bird = Bird::new(fields, uris);
    if let Err(e) = state.birds().save(&bird).await {
        file::delete_all(state.files(), &bird.images).await;
        return Err(e.into());
    }

    info!(
        bird_id = %bird.id,
        breed = %bird.breed,
        images = bird.images.len(),
        by = %caller.username,
        "bird created"
    );
    Ok(flash_redirect(&session, Level::Success, ADDED, "/admin-panel").await)
}

async fn update_bird(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    session: Session,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let back = format!("/birds/{id}/edit");
    let form = read_bird_form(&mut multipart, state.upload_policy()).await?;

    let fields = match form.input.validate() {
        Ok(fields) if form.upload_errors.is_empty() => fields,
        Ok(_) => {
            return Ok(flash_all_redirect(&session, Level::Danger, form.upload_errors, &back).await);
        }
        Err(errors) => {
            let mut messages = errors.into_messages();
            messages.extend(form.upload_errors);
            return Ok(flash_all_redirect(&session, Level::Danger, messages, &back).await);
        }
    };

    let mut bird = state
        .birds()
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    bird.apply(fields);

    // New uploads replace the old set; no uploads keeps it.
    let replaced = if form.images.is_empty() {
        Vec::new()
    } else {
        let uris = file::store_batch(state.files(), form.images).await?;
        std::mem::replace(&mut bird.images, uris)
    };

    if let Err(e) = state.birds().save(&bird).await {
        if !replaced.is_empty() {
            file::delete_all(state.files(), &bird.images).await;
        }
        return Err(e.into());
    }
    file::delete_all(state.files(), &replaced).await;

    info!(bird_id = %bird.id, replaced_images = replaced.len(), by = %caller.username, "bird updated");
    Ok(flash_redirect(&session, Level::Success, UPDATED, "/admin-panel").await)
}

async fn delete_bird(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Ok(id) = parse_id(&id) else {
        return Ok((StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response());
    };

    let Some(bird) = state.birds().find_by_id(id).await? else {
        return Ok((StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response());
    };

    let deleted = state.birds().delete(id).await?;
    if deleted {
        file::delete_all(state.files(), &bird.images).await;
        info!(bird_id = %id, images = bird.images.len(), by = %caller.username, "bird deleted");
    }

    Ok(Json(json!({ "success": deleted })).into_response())
}
