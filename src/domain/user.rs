use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Email, UserId, UserPasswordHash, Username, VerificationCode};

/// A code that has been mailed out and not yet redeemed. Pairing the code
/// with its issue time means a stored code always has a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCode {
    pub code: VerificationCode,
    pub issued_at: DateTime<Utc>,
}

impl PendingCode {
    fn issue() -> Self {
        Self {
            code: VerificationCode::default(),
            issued_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("submitted code does not match the stored code")]
pub struct CodeMismatch;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub phone: Option<String>,
    pub hash: UserPasswordHash,
    pub email_confirmed: bool,
    pub email_confirmation: Option<PendingCode>,
    pub password_reset: Option<PendingCode>,
}

impl User {
    /// A freshly registered user: unconfirmed, no codes outstanding.
    pub fn new(
        username: Username,
        email: Email,
        phone: Option<String>,
        hash: UserPasswordHash,
    ) -> Self {
        Self {
            id: UserId::default(),
            username,
            email,
            phone,
            hash,
            email_confirmed: false,
            email_confirmation: None,
            password_reset: None,
        }
    }

    /// Draw and store a new confirmation code, replacing any previous one.
    pub fn issue_confirmation_code(&mut self) -> VerificationCode {
        let pending = PendingCode::issue();
        let code = pending.code.clone();
        self.email_confirmation = Some(pending);
        code
    }

    /// Redeem the confirmation code. A mismatch leaves the stored code in
    /// place so the user can retry with the correct one.
    pub fn confirm_email(
        &mut self,
        code: &VerificationCode,
    ) -> Result<(), CodeMismatch> {
        match &self.email_confirmation {
            Some(pending) if pending.code == *code => {
                self.email_confirmed = true;
                self.email_confirmation = None;
                Ok(())
            }
            _ => Err(CodeMismatch),
        }
    }

    /// Draw and store a new password reset code, replacing any previous one.
    pub fn issue_password_reset_code(&mut self) -> VerificationCode {
        let pending = PendingCode::issue();
        let code = pending.code.clone();
        self.password_reset = Some(pending);
        code
    }

    /// Redeem the reset code and install the new password hash. A mismatch
    /// changes nothing.
    pub fn complete_password_reset(
        &mut self,
        code: &VerificationCode,
        new_hash: UserPasswordHash,
    ) -> Result<(), CodeMismatch> {
        match &self.password_reset {
            Some(pending) if pending.code == *code => {
                self.hash = new_hash;
                self.password_reset = None;
                Ok(())
            }
            _ => Err(CodeMismatch),
        }
    }
}
