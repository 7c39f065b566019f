use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, UserId, UserStoreError, Username},
    utils::auth::authenticated_user_id,
};

use super::{parse_email, parse_phone, UserResponse};

#[tracing::instrument(name = "Update user route handler", skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(user_id): Path<uuid::Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), AuthAPIError> {
    authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let user_id = UserId::new(user_id);
    let mut user = state
        .user_store
        .read()
        .await
        .get_user(&user_id)
        .await
        .map_err(|e| match e {
            UserStoreError::UserNotFound => AuthAPIError::UserNotFound,
            err => AuthAPIError::UnexpectedError(eyre!(err)),
        })?;

    if let Some(username) = request.username {
        user.username = Username::parse(&username)?;
    }
    if let Some(email) = request.email {
        user.email = parse_email(email)?;
    }
    if let Some(phone) = request.phone {
        user.phone = parse_phone(Some(phone))?;
    }

    state
        .user_store
        .write()
        .await
        .update_user(user.clone())
        .await
        .map_err(|e| match e {
            UserStoreError::UserAlreadyExists => {
                AuthAPIError::UserAlreadyExists
            }
            UserStoreError::UserNotFound => AuthAPIError::UserNotFound,
            err => AuthAPIError::UnexpectedError(eyre!(err)),
        })?;

    Ok((StatusCode::OK, jar, Json(UserResponse::from(&user))))
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
