use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{campus_event as CampusEventApi, campus_events, campus_events::Model, Id};

use log::*;

/// POST create a new campus Event organized by the authenticated user.
#[utoipa::path(
    post,
    path = "/events",
    request_body = campus_events::Model,
    responses(
        (status = 201, description = "Successfully Created a New Event", body = [campus_events::Model]),
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
    Json(event_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Event from: {event_model:?}");

    let event = CampusEventApi::create(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        event_model,
        &user,
    )
    .await?;

    debug!("New Event: {event:?}");

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), event)))
}

/// GET all Events ordered by start date. Public bulk fetch for client
/// mirror initialization.
#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "Successfully retrieved all Events", body = [campus_events::Model]),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET all Events");

    let events = CampusEventApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), events)))
}

/// GET a particular Event specified by its id.
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(
        ("id" = String, Path, description = "Event id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Event by its id", body = [campus_events::Model]),
        (status = 404, description = "Event not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Event by id: {id}");

    let event = CampusEventApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), event)))
}

/// PUT update an Event. Only the organizer or an admin may update.
#[utoipa::path(
    put,
    path = "/events/{id}",
    params(
        ("id" = sea_orm::prelude::Uuid, Path, description = "Id of event to update"),
    ),
    request_body = campus_events::Model,
    responses(
        (status = 200, description = "Successfully Updated Event", body = [campus_events::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Event not found"),
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
    Json(event_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Event with id: {id}");

    let event = CampusEventApi::update(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        id,
        event_model,
        &user,
    )
    .await?;

    debug!("Updated Event: {event:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), event)))
}

/// DELETE an Event. Only the organizer or an admin may delete.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(
        ("id" = sea_orm::prelude::Uuid, Path, description = "Id of event to delete"),
    ),
    responses(
        (status = 200, description = "Successfully Deleted Event"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Event not found"),
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
    debug!("DELETE Event with id: {id}");

    CampusEventApi::delete(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        id,
        &user,
    )
    .await?;

    Ok(Json(ApiResponse::<()>::no_content(StatusCode::OK.into())))
}
