use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        verify_password_hash, AuthAPIError, Email, User, UserStoreError,
        Username,
    },
    utils::auth::generate_auth_cookie,
};

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<LoginResponse>), AuthAPIError> {
    let user = find_user(&state, &request.username).await?;

    verify_password_hash(
        user.hash.as_ref().to_owned(),
        request.password.clone(),
    )
    .await
    .map_err(|_| AuthAPIError::IncorrectCredentials)?;

    // Credentials are fine, but the account is unusable until the email
    // address has been confirmed
    if !user.email_confirmed {
        return Err(AuthAPIError::EmailNotConfirmed);
    }

    let auth_cookie = generate_auth_cookie(&user.email, &user.id)
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
    let updated_jar = jar.add(auth_cookie);

    let response = Json(LoginResponse {
        message: "Logged in successfully".to_string(),
    });

    Ok((StatusCode::OK, updated_jar, response))
}

// Username lookup, falling back to email lookup for identifiers that look
// like an address. Every miss collapses into IncorrectCredentials.
async fn find_user(
    state: &AppState,
    identifier: &str,
) -> Result<User, AuthAPIError> {
    let user_store = state.user_store.read().await;

    if let Ok(username) = Username::parse(identifier) {
        match user_store.get_user_by_username(&username).await {
            Ok(user) => return Ok(user),
            Err(UserStoreError::UserNotFound) => (),
            Err(e) => return Err(AuthAPIError::UnexpectedError(eyre!(e))),
        }
    }

    if identifier.contains('@') {
        if let Ok(email) = Email::parse(Secret::new(identifier.to_owned())) {
            return user_store.get_user_by_email(&email).await.map_err(|e| {
                match e {
                    UserStoreError::UserNotFound => {
                        AuthAPIError::IncorrectCredentials
                    }
                    err => AuthAPIError::UnexpectedError(eyre!(err)),
                }
            });
        }
    }

    Err(AuthAPIError::IncorrectCredentials)
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct LoginResponse {
    pub message: String,
}
