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
    domain::{ContactAPIError, ContactId, ContactName, ContactStoreError},
    utils::auth::authenticated_user_id,
};

use super::{parse_contact_email, parse_contact_phone, ContactResponse};

// Handles both PUT and PATCH; absent fields keep their stored values
#[tracing::instrument(name = "Update contact route handler", skip_all)]
pub async fn update_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(contact_id): Path<uuid::Uuid>,
    Json(request): Json<UpdateContactRequest>,
) -> Result<(StatusCode, CookieJar, Json<ContactResponse>), ContactAPIError> {
    let owner =
        authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let contact_id = ContactId::new(contact_id);
    let mut contact = state
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

    if let Some(name) = request.name {
        contact.name = ContactName::parse(&name)?;
    }
    if let Some(email) = request.email {
        contact.email = parse_contact_email(email)?;
    }
    if let Some(phone) = request.phone {
        contact.phone = parse_contact_phone(phone)?;
    }
    if let Some(address) = request.address {
        contact.address = address;
    }

    state
        .contact_store
        .write()
        .await
        .update_contact(&owner, contact.clone())
        .await
        .map_err(|e| match e {
            ContactStoreError::ContactNotFound => {
                ContactAPIError::NotFound(*contact.id.as_ref())
            }
            err => ContactAPIError::UnexpectedError(eyre!(err)),
        })?;

    Ok((StatusCode::OK, jar, Json(ContactResponse::from(&contact))))
}

#[derive(Deserialize)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
