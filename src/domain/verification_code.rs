use color_eyre::eyre::{eyre, Result};
use rand::{rngs::OsRng, Rng};
use secrecy::{ExposeSecret, Secret};

/// Six-digit code mailed to a user to prove control of their email address,
/// used by both the confirmation and the password reset flows.
#[derive(Clone, Debug)]
pub struct VerificationCode(Secret<String>);

impl VerificationCode {
    pub fn parse(code: Secret<String>) -> Result<Self> {
        let regex = regex::Regex::new(r"^\d{6}$")
            .expect("Regex for VerificationCode parser is invalid");
        if regex.is_match(code.expose_secret()) {
            Ok(Self(code))
        } else {
            Err(eyre!("Code is invalid"))
        }
    }
}

impl PartialEq for VerificationCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Default for VerificationCode {
    // Six independently drawn decimal digits from the OS CSPRNG.
    fn default() -> Self {
        let mut rng = OsRng;
        let code: String = (0..6)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        VerificationCode(Secret::new(code))
    }
}

impl AsRef<Secret<String>> for VerificationCode {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
