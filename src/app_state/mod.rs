use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    BannedTokenStore, ContactStore, EmailClient, FlowSessionStore, UserStore,
};

pub type UserStoreType = Arc<RwLock<dyn UserStore + Send + Sync>>;
pub type ContactStoreType = Arc<RwLock<dyn ContactStore + Send + Sync>>;
pub type BannedTokenStoreType = Arc<RwLock<dyn BannedTokenStore + Send + Sync>>;
pub type FlowSessionStoreType =
    Arc<RwLock<dyn FlowSessionStore + Send + Sync>>;
pub type EmailClientType = Arc<dyn EmailClient + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub user_store: UserStoreType,
    pub contact_store: ContactStoreType,
    pub banned_token_store: BannedTokenStoreType,
    /// Registration → pending email verification sessions.
    pub verification_sessions: FlowSessionStoreType,
    /// Password reset sessions.
    pub reset_sessions: FlowSessionStoreType,
    pub email_client: EmailClientType,
}

impl AppState {
    pub fn new(
        user_store: UserStoreType,
        contact_store: ContactStoreType,
        banned_token_store: BannedTokenStoreType,
        verification_sessions: FlowSessionStoreType,
        reset_sessions: FlowSessionStoreType,
        email_client: EmailClientType,
    ) -> Self {
        Self {
            user_store,
            contact_store,
            banned_token_store,
            verification_sessions,
            reset_sessions,
            email_client,
        }
    }
}
