use super::{
    Contact, ContactId, Email, FlowToken, User, UserId, Username,
};
use color_eyre::eyre::{Report, Result};
use secrecy::Secret;
use thiserror::Error;

#[async_trait::async_trait]
pub trait UserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError>;
    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<User, UserStoreError>;
    /// Case-insensitive email lookup.
    async fn get_user_by_email(
        &self,
        email: &Email,
    ) -> Result<User, UserStoreError>;
    async fn list_users(&self) -> Result<Vec<User>, UserStoreError>;
    /// Single-row replace keyed by `user.id`.
    async fn update_user(&mut self, user: User) -> Result<(), UserStoreError>;
    async fn delete_user(&mut self, id: &UserId)
        -> Result<(), UserStoreError>;
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait ContactStore {
    async fn add_contact(
        &mut self,
        contact: Contact,
    ) -> Result<(), ContactStoreError>;
    /// Lookup scoped to the owner; a contact owned by someone else is
    /// indistinguishable from one that does not exist.
    async fn get_contact(
        &self,
        owner: &UserId,
        id: &ContactId,
    ) -> Result<Contact, ContactStoreError>;
    /// Owner's contacts sorted by name, optionally filtered by a
    /// case-insensitive substring over name, email and phone.
    async fn list_contacts(
        &self,
        owner: &UserId,
        search: Option<&str>,
    ) -> Result<Vec<Contact>, ContactStoreError>;
    async fn update_contact(
        &mut self,
        owner: &UserId,
        contact: Contact,
    ) -> Result<(), ContactStoreError>;
    async fn delete_contact(
        &mut self,
        owner: &UserId,
        id: &ContactId,
    ) -> Result<(), ContactStoreError>;
    /// Remove every contact owned by `owner` (user deletion cascade).
    async fn delete_contacts_for_user(
        &mut self,
        owner: &UserId,
    ) -> Result<(), ContactStoreError>;
}

#[derive(Debug, Error)]
pub enum ContactStoreError {
    #[error("Contact not found")]
    ContactNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for ContactStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::ContactNotFound, Self::ContactNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait BannedTokenStore {
    async fn add_token(&mut self, token: &Secret<String>) -> Result<()>;
    async fn check_token(
        &self,
        token: &Secret<String>,
    ) -> Result<(), BannedTokenStoreError>;
}

#[derive(Debug, Error)]
pub enum BannedTokenStoreError {
    #[error("Token is banned")]
    BannedToken,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for BannedTokenStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::BannedToken, Self::BannedToken)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Token-to-user mapping backing the pending-verification and password
/// reset sessions. One instance per flow.
#[async_trait::async_trait]
pub trait FlowSessionStore {
    async fn add_session(
        &mut self,
        token: FlowToken,
        user_id: UserId,
    ) -> Result<(), FlowSessionStoreError>;
    async fn get_user_id(
        &self,
        token: &FlowToken,
    ) -> Result<UserId, FlowSessionStoreError>;
    async fn remove_session(
        &mut self,
        token: &FlowToken,
    ) -> Result<(), FlowSessionStoreError>;
    /// Remove the session mapped to `user_id` without knowing its token.
    async fn remove_sessions_for_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), FlowSessionStoreError>;
}

#[derive(Debug, Error)]
pub enum FlowSessionStoreError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for FlowSessionStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::SessionNotFound, Self::SessionNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
