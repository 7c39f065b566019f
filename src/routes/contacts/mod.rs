mod create_contact;
mod delete_contact;
mod get_contact;
mod list_contacts;
mod update_contact;

pub use create_contact::*;
pub use delete_contact::*;
pub use get_contact::*;
pub use list_contacts::*;
pub use update_contact::*;

use serde::{Deserialize, Serialize};

use crate::domain::{Contact, ValidationError};

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct ContactResponse {
    pub id: String,
    pub user: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<&Contact> for ContactResponse {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.as_ref().to_string(),
            user: contact.user_id.as_ref().to_string(),
            name: contact.name.as_ref().to_owned(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
        }
    }
}

pub(super) fn parse_contact_email(
    email: String,
) -> Result<String, ValidationError> {
    if !validator::validate_email(email.as_str()) {
        return Err(ValidationError::new(
            "Invalid contact email address".to_string(),
        ));
    }
    Ok(email)
}

pub(super) fn parse_contact_phone(
    phone: String,
) -> Result<String, ValidationError> {
    match phone.chars().count() {
        0 => Err(ValidationError::new(
            "Contact phone cannot be empty".to_string(),
        )),
        x if x > 20 => Err(ValidationError::new(
            "Max contact phone length is 20 characters".to_string(),
        )),
        _ => Ok(phone),
    }
}
