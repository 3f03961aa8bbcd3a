use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{timetable_entries, timetable_entries::Model, timetable_entry as TimetableEntryApi, Id};

use log::*;

/// POST create a new Timetable Entry.
#[utoipa::path(
    post,
    path = "/timetable_entries",
    request_body = timetable_entries::Model,
    responses(
        (status = 201, description = "Successfully Created a New Timetable Entry", body = [timetable_entries::Model]),
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
    Json(entry_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Timetable Entry from: {entry_model:?}");

    let entry = TimetableEntryApi::create(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        entry_model,
        &user,
    )
    .await?;

    debug!("New Timetable Entry: {entry:?}");

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), entry)))
}

/// GET all Timetable Entries in weekly order (day, then start time).
/// Public bulk fetch for client mirror initialization.
#[utoipa::path(
    get,
    path = "/timetable_entries",
    responses(
        (status = 200, description = "Successfully retrieved all Timetable Entries", body = [timetable_entries::Model]),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET all Timetable Entries");

    let entries = TimetableEntryApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), entries)))
}

/// PUT update a Timetable Entry. Any staff member may update an entry.
#[utoipa::path(
    put,
    path = "/timetable_entries/{id}",
    params(
        ("id" = sea_orm::prelude::Uuid, Path, description = "Id of timetable entry to update"),
    ),
    request_body = timetable_entries::Model,
    responses(
        (status = 200, description = "Successfully Updated Timetable Entry", body = [timetable_entries::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Timetable entry not found"),
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
    Json(entry_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Timetable Entry with id: {id}");

    let entry = TimetableEntryApi::update(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        id,
        entry_model,
        &user,
    )
    .await?;

    debug!("Updated Timetable Entry: {entry:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), entry)))
}

/// DELETE a Timetable Entry.
#[utoipa::path(
    delete,
    path = "/timetable_entries/{id}",
    params(
        ("id" = sea_orm::prelude::Uuid, Path, description = "Id of timetable entry to delete"),
    ),
    responses(
        (status = 200, description = "Successfully Deleted Timetable Entry"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Timetable entry not found"),
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
    debug!("DELETE Timetable Entry with id: {id}");

    TimetableEntryApi::delete(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        id,
        &user,
    )
    .await?;

    Ok(Json(ApiResponse::<()>::no_content(StatusCode::OK.into())))
}
