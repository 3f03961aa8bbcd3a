use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{announcement as AnnouncementApi, announcements, announcements::Model, Id};

use log::*;

/// POST create a new Announcement. On success the created record is
/// broadcast to every connected session.
#[utoipa::path(
    post,
    path = "/announcements",
    request_body = announcements::Model,
    responses(
        (status = 201, description = "Successfully Created a New Announcement", body = [announcements::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(announcement_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Announcement from: {announcement_model:?}");

    let announcement = AnnouncementApi::create(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        announcement_model,
        &user,
    )
    .await?;

    debug!("New Announcement: {announcement:?}");

    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        announcement,
    )))
}

/// GET all Announcements, newest first. Public: this is the bulk fetch that
/// clients use to (re)initialize their local mirror.
#[utoipa::path(
    get,
    path = "/announcements",
    responses(
        (status = 200, description = "Successfully retrieved all Announcements", body = [announcements::Model]),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET all Announcements");

    let announcements = AnnouncementApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        announcements,
    )))
}

/// GET a particular Announcement specified by its id.
#[utoipa::path(
    get,
    path = "/announcements/{id}",
    params(
        ("id" = String, Path, description = "Announcement id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Announcement by its id", body = [announcements::Model]),
        (status = 404, description = "Announcement not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Announcement by id: {id}");

    let announcement = AnnouncementApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), announcement)))
}

/// PUT update an Announcement. Only the author or an admin may update;
/// the updated record is broadcast on success.
#[utoipa::path(
    put,
    path = "/announcements/{id}",
    params(
        ("id" = sea_orm::prelude::Uuid, Path, description = "Id of announcement to update"),
    ),
    request_body = announcements::Model,
    responses(
        (status = 200, description = "Successfully Updated Announcement", body = [announcements::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Announcement not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(announcement_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Announcement with id: {id}");

    let announcement = AnnouncementApi::update(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        id,
        announcement_model,
        &user,
    )
    .await?;

    debug!("Updated Announcement: {announcement:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), announcement)))
}

/// DELETE an Announcement. Only the author or an admin may delete; the
/// deleted id is broadcast on success.
#[utoipa::path(
    delete,
    path = "/announcements/{id}",
    params(
        ("id" = sea_orm::prelude::Uuid, Path, description = "Id of announcement to delete"),
    ),
    responses(
        (status = 200, description = "Successfully Deleted Announcement"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Announcement not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Announcement with id: {id}");

    AnnouncementApi::delete(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        id,
        &user,
    )
    .await?;

    Ok(Json(ApiResponse::<()>::no_content(StatusCode::OK.into())))
}
