use super::ValidationError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[\w.@+-]+$")
        .expect("Regex for Username parser is invalid");
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        match name.chars().count() {
            x if x < 1 => Err(ValidationError::new(
                "Username cannot be empty".to_string(),
            )),
            x if x > 150 => Err(ValidationError::new(
                "Max username length is 150 characters".to_string(),
            )),
            _ if !USERNAME_REGEX.is_match(name) => Err(ValidationError::new(
                "Username may only contain letters, digits and @/./+/-/_"
                    .to_string(),
            )),
            _ => Ok(Self(name.to_owned())),
        }
    }
}

impl AsRef<String> for Username {
    fn as_ref(&self) -> &String {
        &self.0
    }
}
