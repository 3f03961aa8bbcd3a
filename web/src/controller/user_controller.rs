use crate::controller::ApiResponse;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{user as UserApi, users, users::Model};

use log::*;

/// POST register a new user account. Open signup; the created account always
/// gets the student role.
#[utoipa::path(
    post,
    path = "/users",
    request_body = users::Model,
    responses(
        (status = 201, description = "Successfully Registered a New User", body = [users::Model]),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(user_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Register a New User with email: {:?}", user_model.email);

    let user = UserApi::create(app_state.db_conn_ref(), user_model).await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), user)))
}
