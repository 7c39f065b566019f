use super::{ContactId, UserId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactName(String);

impl ContactName {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        match name.chars().count() {
            x if x < 1 => Err(ValidationError::new(
                "Contact name cannot be empty".to_string(),
            )),
            x if x > 255 => Err(ValidationError::new(
                "Max contact name length is 255 characters".to_string(),
            )),
            _ => Ok(Self(name.to_owned())),
        }
    }
}

impl AsRef<String> for ContactName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

/// An address-book entry. Every contact belongs to exactly one user and is
/// only ever visible to that user.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub user_id: UserId,
    pub name: ContactName,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Contact {
    pub fn new(
        user_id: UserId,
        name: ContactName,
        email: String,
        phone: String,
        address: String,
    ) -> Self {
        Self {
            id: ContactId::default(),
            user_id,
            name,
            email,
            phone,
            address,
        }
    }

    /// Case-insensitive substring match over name, email and phone.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.as_ref().to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
            || self.phone.to_lowercase().contains(&term)
    }
}
