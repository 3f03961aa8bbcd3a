use crate::controller::ApiResponse;
use crate::error::{Error as WebError, Result as WebResult};
use crate::extractors::authenticated_user::AuthenticatedUser;
use axum::{http::StatusCode, response::IntoResponse, Form, Json};
use domain::user::{AuthSession, Credentials};
use domain::users;
use log::*;
use serde_json::json;

/// Logs the user into the noticeboard and returns a new session cookie.
///
/// Successful login will return a session cookie with id, e.g.:
/// set-cookie: id=07bbbe54-bd35-425f-8e63-618a8d8612df; HttpOnly; SameSite=Strict; Path=/; Max-Age=86399
///
/// After logging in successfully, you must pass the session id back to the server for
/// every authenticated API call.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = domain::user::Credentials, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logs in and returns session authentication cookie"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn login(
    mut auth_session: AuthSession,
    Form(creds): Form<Credentials>,
) -> WebResult<impl IntoResponse> {
    let user = match auth_session.authenticate(creds.clone()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            // No user found - this should also be treated as an authentication error
            warn!("Authentication failed, invalid user: {:?}", creds.email);
            return Err(unauthenticated(None));
        }
        Err(auth_error) => {
            // Convert the axum_login error into a WebError that maps to a 401
            // through the web layer.
            error!("Authentication failed with error: {auth_error:?}");
            return Err(unauthenticated(Some(Box::new(auth_error))));
        }
    };

    if let Err(login_error) = auth_session.login(&user).await {
        warn!("Session login failed: {login_error:?}");
        return Err(WebError::from(domain::error::Error {
            source: Some(Box::new(login_error)),
            error_kind: domain::error::DomainErrorKind::Internal(
                domain::error::InternalErrorKind::Other("Session login failed".to_string()),
            ),
        }));
    }

    let user_session_json = user_session_json(&user);

    debug!("user_session_json: {user_session_json}");

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        user_session_json,
    )))
}

/// Returns the currently logged-in user, so the single-page app can restore
/// its session on page load from the cookie alone.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "The logged-in user's session details"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> WebResult<impl IntoResponse> {
    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        user_session_json(&user),
    )))
}

/// Logs the user out of the noticeboard by destroying their session.
#[utoipa::path(
    delete,
    path = "/logout",
    responses(
        (status = 200, description = "Successfully logged out"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn logout(mut auth_session: AuthSession) -> WebResult<impl IntoResponse> {
    match auth_session.logout().await {
        Ok(_) => Ok(Json(ApiResponse::<()>::no_content(StatusCode::OK.into()))),
        Err(logout_error) => {
            warn!("Session logout failed: {logout_error:?}");
            Err(WebError::from(domain::error::Error {
                source: Some(Box::new(logout_error)),
                error_kind: domain::error::DomainErrorKind::Internal(
                    domain::error::InternalErrorKind::Other("Session logout failed".to_string()),
                ),
            }))
        }
    }
}

// The session body returned by both login and me. Deliberately a hand-picked
// field set so the password hash can never leak into a response.
fn user_session_json(user: &users::Model) -> serde_json::Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "department": user.department,
    })
}

fn unauthenticated(
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
) -> WebError {
    WebError::from(domain::error::Error {
        source,
        error_kind: domain::error::DomainErrorKind::Internal(
            domain::error::InternalErrorKind::Entity(
                domain::error::EntityErrorKind::Unauthenticated,
            ),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn session_json_carries_profile_fields_but_never_the_password() {
        let now = Utc::now();
        let user = users::Model {
            id: domain::Id::new_v4(),
            name: "Dr. Grace Okafor".to_string(),
            email: "g.okafor@noticeboard.edu".to_string(),
            password: "hashed-secret".to_string(),
            role: users::Role::Staff,
            department: Some("Computer Science".to_string()),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let body = user_session_json(&user);

        assert_eq!(body["id"], json!(user.id));
        assert_eq!(body["name"], json!("Dr. Grace Okafor"));
        assert_eq!(body["email"], json!("g.okafor@noticeboard.edu"));
        assert_eq!(body["role"], json!("staff"));
        assert_eq!(body["department"], json!("Computer Science"));
        assert!(body.get("password").is_none());
    }
}
