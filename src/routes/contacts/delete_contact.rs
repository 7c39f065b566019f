use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{ContactAPIError, ContactId, ContactStoreError},
    utils::auth::authenticated_user_id,
};

#[tracing::instrument(name = "Delete contact route handler", skip_all)]
pub async fn delete_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(contact_id): Path<uuid::Uuid>,
) -> Result<(StatusCode, CookieJar), ContactAPIError> {
    let owner =
        authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let contact_id = ContactId::new(contact_id);
    state
        .contact_store
        .write()
        .await
        .delete_contact(&owner, &contact_id)
        .await
        .map_err(|e| match e {
            ContactStoreError::ContactNotFound => {
                ContactAPIError::NotFound(*contact_id.as_ref())
            }
            err => ContactAPIError::UnexpectedError(eyre!(err)),
        })?;

    Ok((StatusCode::NO_CONTENT, jar))
}
