use std::sync::Arc;

use color_eyre::eyre::{eyre, WrapErr};
use redis::{Commands, Connection};
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use crate::domain::{
    FlowSessionStore, FlowSessionStoreError, FlowToken, UserId,
};

/// Redis-backed token-to-user mapping. Each flow (email verification,
/// password reset) gets its own key prefix so tokens from one flow cannot
/// be redeemed in the other.
pub struct RedisFlowSessionStore {
    conn: Arc<RwLock<Connection>>,
    key_prefix: &'static str,
}

impl RedisFlowSessionStore {
    pub fn for_verification(conn: Arc<RwLock<Connection>>) -> Self {
        Self {
            conn,
            key_prefix: VERIFICATION_SESSION_KEY_PREFIX,
        }
    }

    pub fn for_password_reset(conn: Arc<RwLock<Connection>>) -> Self {
        Self {
            conn,
            key_prefix: RESET_SESSION_KEY_PREFIX,
        }
    }

    fn get_key(&self, token: &FlowToken) -> String {
        format!("{}{}", self.key_prefix, token.as_ref().expose_secret())
    }

    // Reverse mapping so a user's session can be dropped without its token
    fn get_user_key(&self, user_id: &UserId) -> String {
        format!("{}user:{}", self.key_prefix, user_id.as_ref())
    }
}

#[async_trait::async_trait]
impl FlowSessionStore for RedisFlowSessionStore {
    #[tracing::instrument(
        name = "Adding session to Redis flow session store",
        skip_all
    )]
    async fn add_session(
        &mut self,
        token: FlowToken,
        user_id: UserId,
    ) -> Result<(), FlowSessionStoreError> {
        let key = self.get_key(&token);
        let user_key = self.get_user_key(&user_id);

        let mut conn = self.conn.write().await;
        conn.set::<_, _, ()>(key, user_id.as_ref().to_string())
            .wrap_err("failed to set flow session in Redis")
            .map_err(FlowSessionStoreError::UnexpectedError)?;
        conn.set::<_, _, ()>(
            user_key,
            token.as_ref().expose_secret().to_owned(),
        )
        .wrap_err("failed to set flow session user key in Redis")
        .map_err(FlowSessionStoreError::UnexpectedError)?;
        Ok(())
    }

    #[tracing::instrument(
        name = "Getting session from Redis flow session store",
        skip_all
    )]
    async fn get_user_id(
        &self,
        token: &FlowToken,
    ) -> Result<UserId, FlowSessionStoreError> {
        let key = self.get_key(token);

        let user_id = self.conn.write().await.get::<_, String>(key).map_err(
            |e| match e.kind() {
                redis::ErrorKind::TypeError => {
                    FlowSessionStoreError::SessionNotFound
                }
                _ => FlowSessionStoreError::UnexpectedError(eyre!(e)),
            },
        )?;

        UserId::parse(&user_id)
            .map_err(|e| FlowSessionStoreError::UnexpectedError(eyre!(e)))
    }

    #[tracing::instrument(
        name = "Removing session from Redis flow session store",
        skip_all
    )]
    async fn remove_session(
        &mut self,
        token: &FlowToken,
    ) -> Result<(), FlowSessionStoreError> {
        let key = self.get_key(token);

        let mut conn = self.conn.write().await;
        if let Ok(user_id) = conn.get::<_, String>(&key) {
            conn.del::<_, ()>(format!("{}user:{}", self.key_prefix, user_id))
                .wrap_err("failed to delete flow session user key from Redis")
                .map_err(FlowSessionStoreError::UnexpectedError)?;
        }
        conn.del::<_, ()>(key)
            .wrap_err("failed to delete flow session from Redis")
            .map_err(FlowSessionStoreError::UnexpectedError)?;
        Ok(())
    }

    #[tracing::instrument(
        name = "Removing user's session from Redis flow session store",
        skip_all
    )]
    async fn remove_sessions_for_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), FlowSessionStoreError> {
        let user_key = self.get_user_key(user_id);

        let mut conn = self.conn.write().await;
        if let Ok(token) = conn.get::<_, String>(&user_key) {
            conn.del::<_, ()>(format!("{}{}", self.key_prefix, token))
                .wrap_err("failed to delete flow session from Redis")
                .map_err(FlowSessionStoreError::UnexpectedError)?;
        }
        conn.del::<_, ()>(user_key)
            .wrap_err("failed to delete flow session user key from Redis")
            .map_err(FlowSessionStoreError::UnexpectedError)?;
        Ok(())
    }
}

const VERIFICATION_SESSION_KEY_PREFIX: &str = "verification_session:";
const RESET_SESSION_KEY_PREFIX: &str = "reset_session:";
