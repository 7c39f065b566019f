use axum::{extract::State, http::StatusCode, Json};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{app_state::AppState, domain::AuthAPIError};

use super::register_user;

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthAPIError> {
    let (_user, token) = register_user(
        &state,
        request.username,
        request.email,
        request.phone,
        request.password,
    )
    .await?;

    let response = Json(RegisterResponse {
        message: "User created successfully. Check your email for the confirmation code.".to_string(),
        pending_verification_token: token.as_ref().expose_secret().to_owned(),
    });

    Ok((StatusCode::CREATED, response))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Secret<String>,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "pendingVerificationToken")]
    pub pending_verification_token: String,
}
