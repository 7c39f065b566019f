use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, FlowToken, Password, UserPasswordHash, VerificationCode,
    },
    utils::auth::generate_auth_cookie,
};

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<(StatusCode, CookieJar, Json<ResetPasswordResponse>), AuthAPIError>
{
    let token = FlowToken::parse(Secret::new(request.token))
        .map_err(|_| AuthAPIError::NoResetSession)?;

    let user_id = state
        .reset_sessions
        .read()
        .await
        .get_user_id(&token)
        .await
        .map_err(|_| AuthAPIError::NoResetSession)?;

    if request.new_password.expose_secret()
        != request.new_password_confirmation.expose_secret()
    {
        return Err(AuthAPIError::PasswordMismatch);
    }

    let password = Password::parse(request.new_password)?;

    let code = VerificationCode::parse(Secret::new(request.code))
        .map_err(|_| AuthAPIError::CodeMismatch)?;

    let mut user = state
        .user_store
        .read()
        .await
        .get_user(&user_id)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    let new_hash = UserPasswordHash::from_password(&password)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    user.complete_password_reset(&code, new_hash)
        .map_err(|_| AuthAPIError::CodeMismatch)?;

    state
        .user_store
        .write()
        .await
        .update_user(user.clone())
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    // The session is single-use; a repeat submission finds nothing
    state
        .reset_sessions
        .write()
        .await
        .remove_session(&token)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    let auth_cookie = generate_auth_cookie(&user.email, &user.id)
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
    let updated_jar = jar.add(auth_cookie);

    let response = Json(ResetPasswordResponse {
        message: "Password reset successfully".to_string(),
    });

    Ok((StatusCode::OK, updated_jar, response))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub code: String,
    #[serde(rename = "newPassword")]
    pub new_password: Secret<String>,
    #[serde(rename = "newPasswordConfirmation")]
    pub new_password_confirmation: Secret<String>,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct ResetPasswordResponse {
    pub message: String,
}
