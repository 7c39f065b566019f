use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, UserId, UserStoreError},
    utils::auth::authenticated_user_id,
};

use super::UserResponse;

#[tracing::instrument(name = "Get user route handler", skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(user_id): Path<uuid::Uuid>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), AuthAPIError> {
    authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let user = state
        .user_store
        .read()
        .await
        .get_user(&UserId::new(user_id))
        .await
        .map_err(|e| match e {
            UserStoreError::UserNotFound => AuthAPIError::UserNotFound,
            err => AuthAPIError::UnexpectedError(eyre!(err)),
        })?;

    Ok((StatusCode::OK, jar, Json(UserResponse::from(&user))))
}
