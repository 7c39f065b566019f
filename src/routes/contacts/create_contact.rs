use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{Contact, ContactAPIError, ContactName},
    utils::auth::authenticated_user_id,
};

use super::{parse_contact_email, parse_contact_phone, ContactResponse};

#[tracing::instrument(name = "Create contact route handler", skip_all)]
pub async fn create_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CreateContactRequest>,
) -> Result<(StatusCode, CookieJar, Json<ContactResponse>), ContactAPIError> {
    let owner =
        authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let name = ContactName::parse(&request.name)?;
    let email = parse_contact_email(request.email)?;
    let phone = parse_contact_phone(request.phone)?;
    let address = request.address.unwrap_or_default();

    let contact = Contact::new(owner, name, email, phone, address);

    state
        .contact_store
        .write()
        .await
        .add_contact(contact.clone())
        .await
        .map_err(|e| ContactAPIError::UnexpectedError(eyre!(e)))?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ContactResponse::from(&contact)),
    ))
}

#[derive(Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
}
