use color_eyre::eyre::{eyre, Result, WrapErr};
use redis::{Commands, Connection};
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{BannedTokenStore, BannedTokenStoreError},
    utils::auth::TOKEN_TTL_SECONDS,
};

/// Auth tokens revoked by logout. Entries expire with the token itself:
/// once the JWT's own TTL has passed, validation rejects it anyway.
pub struct RedisBannedTokenStore {
    conn: Arc<RwLock<Connection>>,
}

impl RedisBannedTokenStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl BannedTokenStore for RedisBannedTokenStore {
    #[tracing::instrument(name = "Banning token in Redis", skip_all)]
    async fn add_token(&mut self, token: &Secret<String>) -> Result<()> {
        let ban_ttl_seconds: u64 = TOKEN_TTL_SECONDS
            .try_into()
            .wrap_err("failed to cast TOKEN_TTL_SECONDS to u64")?;

        self.conn
            .write()
            .await
            .set_ex::<_, _, ()>(banned_key(token), true, ban_ttl_seconds)
            .wrap_err("failed to store banned token in Redis")?;

        Ok(())
    }

    #[tracing::instrument(name = "Checking Redis banned token store", skip_all)]
    async fn check_token(
        &self,
        token: &Secret<String>,
    ) -> Result<(), BannedTokenStoreError> {
        let is_banned: bool = self
            .conn
            .write()
            .await
            .exists(banned_key(token))
            .map_err(|e| {
                BannedTokenStoreError::UnexpectedError(
                    eyre!(e).wrap_err("failed to check token in Redis"),
                )
            })?;

        if is_banned {
            Err(BannedTokenStoreError::BannedToken)
        } else {
            Ok(())
        }
    }
}

const BANNED_TOKEN_KEY_PREFIX: &str = "banned_token:";

fn banned_key(token: &Secret<String>) -> String {
    format!("{}{}", BANNED_TOKEN_KEY_PREFIX, token.expose_secret())
}
