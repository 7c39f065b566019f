use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, UserId, UserStoreError},
    utils::auth::authenticated_user_id,
};

#[tracing::instrument(name = "Delete user route handler", skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(user_id): Path<uuid::Uuid>,
) -> Result<(StatusCode, CookieJar), AuthAPIError> {
    authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let user_id = UserId::new(user_id);

    state
        .user_store
        .write()
        .await
        .delete_user(&user_id)
        .await
        .map_err(|e| match e {
            UserStoreError::UserNotFound => AuthAPIError::UserNotFound,
            err => AuthAPIError::UnexpectedError(eyre!(err)),
        })?;

    // A deleted account takes its address book with it
    state
        .contact_store
        .write()
        .await
        .delete_contacts_for_user(&user_id)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    Ok((StatusCode::NO_CONTENT, jar))
}
