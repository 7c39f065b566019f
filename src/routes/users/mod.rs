mod create_user;
mod delete_user;
mod forgot_password;
mod get_user;
mod list_users;
mod register;
mod reset_password;
mod update_user;
mod verify_email;

pub use create_user::*;
pub use delete_user::*;
pub use forgot_password::*;
pub use get_user::*;
pub use list_users::*;
pub use register::*;
pub use reset_password::*;
pub use update_user::*;
pub use verify_email::*;

use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        AuthAPIError, Email, FlowToken, Password, User, UserPasswordHash,
        UserStoreError, Username, ValidationError,
    },
};

pub const CONFIRMATION_EMAIL_SUBJECT: &str = "Confirm your Contacts App email";
pub const RESET_EMAIL_SUBJECT: &str = "Reset your Contacts App password";

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(rename = "emailConfirmed")]
    pub email_confirmed: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_ref().to_string(),
            username: user.username.as_ref().to_owned(),
            email: user.email.as_ref().expose_secret().to_owned(),
            phone: user.phone.clone(),
            email_confirmed: user.email_confirmed,
        }
    }
}

pub(super) fn parse_email(email: String) -> Result<Email, AuthAPIError> {
    Email::parse(Secret::new(email)).map_err(|_| {
        ValidationError::new("Invalid email address".to_string()).into()
    })
}

// An empty phone field means "no phone"
pub(super) fn parse_phone(
    phone: Option<String>,
) -> Result<Option<String>, ValidationError> {
    match phone {
        None => Ok(None),
        Some(p) if p.is_empty() => Ok(None),
        Some(p) if p.chars().count() > 20 => Err(ValidationError::new(
            "Max phone length is 20 characters".to_string(),
        )),
        Some(p) => Ok(Some(p)),
    }
}

/// Registration core shared by the signup route and the user API's create
/// operation: create the unconfirmed account, issue a confirmation code,
/// open a verification session and dispatch the confirmation email.
#[tracing::instrument(name = "Registering user", skip_all)]
pub(super) async fn register_user(
    state: &AppState,
    username: String,
    email: String,
    phone: Option<String>,
    password: Secret<String>,
) -> Result<(User, FlowToken), AuthAPIError> {
    let username = Username::parse(&username)?;
    let email = parse_email(email)?;
    let phone = parse_phone(phone)?;
    let password = Password::parse(password)?;

    let hash = UserPasswordHash::from_password(&password)
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    let mut user = User::new(username, email, phone, hash);
    let code = user.issue_confirmation_code();

    state
        .user_store
        .write()
        .await
        .add_user(user.clone())
        .await
        .map_err(|e| match e {
            UserStoreError::UserAlreadyExists => {
                AuthAPIError::UserAlreadyExists
            }
            err => AuthAPIError::UnexpectedError(err.into()),
        })?;

    let token = FlowToken::default();
    state
        .verification_sessions
        .write()
        .await
        .add_session(token.clone(), user.id.clone())
        .await
        .map_err(|e| AuthAPIError::UnexpectedError(eyre!(e)))?;

    // Delivery failures must not fail the registration
    let content = format!(
        "Your confirmation code is: {}",
        code.as_ref().expose_secret()
    );
    if let Err(e) = state
        .email_client
        .send_email(&user.email, CONFIRMATION_EMAIL_SUBJECT, &content)
        .await
    {
        tracing::warn!("Failed to send confirmation email: {:?}", e);
    }

    Ok((user, token))
}
