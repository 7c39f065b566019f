use color_eyre::eyre::{Context, Result};
use secrecy::{ExposeSecret, Secret};

/// Opaque token handed to a caller mid-flow, standing in for the server-side
/// session key: one maps a registration to its pending email verification,
/// another maps a password reset request to its account.
#[derive(Debug, Clone)]
pub struct FlowToken(Secret<String>);

impl PartialEq for FlowToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl FlowToken {
    pub fn parse(token: Secret<String>) -> Result<Self> {
        let parsed = uuid::Uuid::try_parse(token.expose_secret())
            .wrap_err("Invalid flow token")?;
        Ok(Self(Secret::new(parsed.to_string())))
    }
}

impl Default for FlowToken {
    fn default() -> Self {
        let token = String::from(uuid::Uuid::new_v4());
        FlowToken(Secret::new(token))
    }
}

impl AsRef<Secret<String>> for FlowToken {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
