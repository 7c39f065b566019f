use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, FlowToken, User, VerificationCode},
    utils::auth::{authenticated_user_id, generate_auth_cookie},
};

#[tracing::instrument(name = "Verify email", skip_all)]
pub async fn verify_email(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<(StatusCode, CookieJar, Json<VerifyEmailResponse>), AuthAPIError> {
    let (mut user, token) = resolve_target(&state, &jar, request.token).await?;

    let code = VerificationCode::parse(Secret::new(request.code))
        .map_err(|_| AuthAPIError::CodeMismatch)?;

    user.confirm_email(&code)
        .map_err(|_| AuthAPIError::CodeMismatch)?;

    state
        .user_store
        .write()
        .await
        .update_user(user.clone())
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    // Confirmation consumes the verification session. Without a token the
    // target came from the auth cookie, so the session left over from
    // registration is removed by user id instead.
    match token {
        Some(token) => {
            state
                .verification_sessions
                .write()
                .await
                .remove_session(&token)
                .await
        }
        None => {
            state
                .verification_sessions
                .write()
                .await
                .remove_sessions_for_user(&user.id)
                .await
        }
    }
    .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    let auth_cookie = generate_auth_cookie(&user.email, &user.id)
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;
    let updated_jar = jar.add(auth_cookie);

    let response = Json(VerifyEmailResponse {
        message: "Email confirmed successfully".to_string(),
    });

    Ok((StatusCode::OK, updated_jar, response))
}

// The target account comes from the auth cookie when it names an
// unconfirmed user, otherwise from the pending-verification token.
async fn resolve_target(
    state: &AppState,
    jar: &CookieJar,
    token: Option<String>,
) -> Result<(User, Option<FlowToken>), AuthAPIError> {
    if let Ok(user_id) =
        authenticated_user_id(jar, state.banned_token_store.clone()).await
    {
        if let Ok(user) = state.user_store.read().await.get_user(&user_id).await
        {
            if !user.email_confirmed {
                return Ok((user, None));
            }
        }
    }

    let token = token
        .and_then(|t| FlowToken::parse(Secret::new(t)).ok())
        .ok_or(AuthAPIError::NoPendingVerification)?;

    let user_id = state
        .verification_sessions
        .read()
        .await
        .get_user_id(&token)
        .await
        .map_err(|_| AuthAPIError::NoPendingVerification)?;

    let user = state
        .user_store
        .read()
        .await
        .get_user(&user_id)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    Ok((user, Some(token)))
}

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub token: Option<String>,
    pub code: String,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct VerifyEmailResponse {
    pub message: String,
}
