use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState, domain::AuthAPIError,
    utils::auth::authenticated_user_id,
};

use super::UserResponse;

#[tracing::instrument(name = "List users route handler", skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<Vec<UserResponse>>), AuthAPIError> {
    authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let users = state
        .user_store
        .read()
        .await
        .list_users()
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    let response = Json(users.iter().map(UserResponse::from).collect());

    Ok((StatusCode::OK, jar, response))
}
