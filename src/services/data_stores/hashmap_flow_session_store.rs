use std::collections::HashMap;

use secrecy::ExposeSecret;

use crate::domain::{
    FlowSessionStore, FlowSessionStoreError, FlowToken, UserId,
};

#[derive(Default)]
pub struct HashmapFlowSessionStore {
    sessions: HashMap<String, UserId>,
}

#[async_trait::async_trait]
impl FlowSessionStore for HashmapFlowSessionStore {
    async fn add_session(
        &mut self,
        token: FlowToken,
        user_id: UserId,
    ) -> Result<(), FlowSessionStoreError> {
        self.sessions
            .insert(token.as_ref().expose_secret().to_owned(), user_id);
        Ok(())
    }

    async fn get_user_id(
        &self,
        token: &FlowToken,
    ) -> Result<UserId, FlowSessionStoreError> {
        match self.sessions.get(token.as_ref().expose_secret()) {
            Some(user_id) => Ok(user_id.clone()),
            None => Err(FlowSessionStoreError::SessionNotFound),
        }
    }

    async fn remove_session(
        &mut self,
        token: &FlowToken,
    ) -> Result<(), FlowSessionStoreError> {
        self.sessions.remove(token.as_ref().expose_secret());
        Ok(())
    }

    async fn remove_sessions_for_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), FlowSessionStoreError> {
        self.sessions.retain(|_, uid| uid != user_id);
        Ok(())
    }
}
