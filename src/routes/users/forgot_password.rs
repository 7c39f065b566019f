use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, Email, FlowToken},
};

use super::RESET_EMAIL_SUBJECT;

/// Start a password reset. The response is identical whether or not the
/// email matches an account, so the endpoint cannot be used to probe for
/// registered addresses: a token is always returned, it just never resolves
/// when no account matched.
#[tracing::instrument(name = "Forgot password", skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<ForgotPasswordResponse>), AuthAPIError> {
    let token = FlowToken::default();

    if let Ok(email) = Email::parse(Secret::new(request.email)) {
        let user = state.user_store.read().await.get_user_by_email(&email).await;

        if let Ok(mut user) = user {
            let code = user.issue_password_reset_code();

            state
                .user_store
                .write()
                .await
                .update_user(user.clone())
                .await
                .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

            state
                .reset_sessions
                .write()
                .await
                .add_session(token.clone(), user.id.clone())
                .await
                .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

            let content = format!(
                "Your password reset code is: {}",
                code.as_ref().expose_secret()
            );
            if let Err(e) = state
                .email_client
                .send_email(&user.email, RESET_EMAIL_SUBJECT, &content)
                .await
            {
                tracing::warn!("Failed to send password reset email: {:?}", e);
            }
        }
    }

    let response = Json(ForgotPasswordResponse {
        message:
            "If an account with that email exists, we sent a reset code."
                .to_string(),
        reset_token: token.as_ref().expose_secret().to_owned(),
    });

    Ok((StatusCode::OK, response))
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct ForgotPasswordResponse {
    pub message: String,
    #[serde(rename = "resetToken")]
    pub reset_token: String,
}
