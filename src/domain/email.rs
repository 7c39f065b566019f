use color_eyre::eyre::{Result, WrapErr};
use secrecy::{ExposeSecret, Secret};
use validator::ValidationError;

use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

/*
 * Equality and hashing are case-insensitive. The password reset flow looks
 * accounts up by email exactly as the user typed it, so "Alice@x.com" must
 * find the account registered as "alice@x.com".
 */
impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret().to_lowercase()
            == other.0.expose_secret().to_lowercase()
    }
}

impl Hash for Email {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.expose_secret().to_lowercase().hash(state);
    }
}

impl Eq for Email {}

impl Email {
    pub fn parse(s: Secret<String>) -> Result<Self> {
        if !validator::validate_email(s.expose_secret()) {
            let mut error = ValidationError::new("Invalid email address");
            error.message = Some("For more details, see the spec: https://html.spec.whatwg.org/multipage/input.html#valid-e-mail-address".into());
            return Err(error).wrap_err("failed to parse email");
        }

        Ok(Self(s))
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
