use axum::{extract::State, http::StatusCode, Json};
use secrecy::Secret;
use serde::Deserialize;

use crate::{app_state::AppState, domain::AuthAPIError};

use super::{register_user, UserResponse};

/// Programmatic counterpart of the signup route: same state machine, but
/// the response is the user representation rather than a message.
#[tracing::instrument(name = "Create user route handler", skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthAPIError> {
    let (user, _token) = register_user(
        &state,
        request.username,
        request.email,
        request.phone,
        request.password,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Secret<String>,
}
