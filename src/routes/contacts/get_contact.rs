use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{ContactAPIError, ContactId, ContactStoreError},
    utils::auth::authenticated_user_id,
};

use super::ContactResponse;

#[tracing::instrument(name = "Get contact route handler", skip_all)]
pub async fn get_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(contact_id): Path<uuid::Uuid>,
) -> Result<(StatusCode, CookieJar, Json<ContactResponse>), ContactAPIError> {
    let owner =
        authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let contact_id = ContactId::new(contact_id);
    let contact = state
        .contact_store
        .read()
        .await
        .get_contact(&owner, &contact_id)
        .await
        .map_err(|e| match e {
            ContactStoreError::ContactNotFound => {
                ContactAPIError::NotFound(*contact_id.as_ref())
            }
            err => ContactAPIError::UnexpectedError(eyre!(err)),
        })?;

    Ok((StatusCode::OK, jar, Json(ContactResponse::from(&contact))))
}
