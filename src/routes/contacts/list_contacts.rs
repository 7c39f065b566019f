use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    app_state::AppState, domain::ContactAPIError,
    utils::auth::authenticated_user_id,
};

use super::ContactResponse;

#[derive(Deserialize)]
pub struct QueryParams {
    search: Option<String>,
}

#[tracing::instrument(name = "List contacts route handler", skip_all)]
pub async fn list_contacts(
    State(state): State<AppState>,
    jar: CookieJar,
    query_params: Query<QueryParams>,
) -> Result<(StatusCode, CookieJar, Json<Vec<ContactResponse>>), ContactAPIError>
{
    let owner =
        authenticated_user_id(&jar, state.banned_token_store.clone()).await?;

    let contacts = state
        .contact_store
        .read()
        .await
        .list_contacts(&owner, query_params.search.as_deref())
        .await
        .map_err(|e| ContactAPIError::UnexpectedError(eyre!(e)))?;

    let response = Json(contacts.iter().map(ContactResponse::from).collect());

    Ok((StatusCode::OK, jar, response))
}
