use crate::domain::{
    Email, User, UserId, UserStore, UserStoreError, Username,
};
use std::collections::HashMap;

#[derive(Default)]
pub struct HashmapUserStore {
    users: HashMap<UserId, User>,
}

impl HashmapUserStore {
    fn is_duplicate(&self, candidate: &User) -> bool {
        self.users.values().any(|existing| {
            existing.id != candidate.id
                && (existing.username == candidate.username
                    || existing.email == candidate.email)
        })
    }
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        if self.users.contains_key(&user.id) || self.is_duplicate(&user) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        match self.users.get(id) {
            Some(user) => Ok(user.clone()),
            None => Err(UserStoreError::UserNotFound),
        }
    }

    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<User, UserStoreError> {
        self.users
            .values()
            .find(|user| user.username == *username)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn get_user_by_email(
        &self,
        email: &Email,
    ) -> Result<User, UserStoreError> {
        // Email equality is case-insensitive
        self.users
            .values()
            .find(|user| user.email == *email)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserStoreError> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.as_ref().cmp(b.username.as_ref()));
        Ok(users)
    }

    async fn update_user(&mut self, user: User) -> Result<(), UserStoreError> {
        if !self.users.contains_key(&user.id) {
            return Err(UserStoreError::UserNotFound);
        }
        if self.is_duplicate(&user) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn delete_user(
        &mut self,
        id: &UserId,
    ) -> Result<(), UserStoreError> {
        match self.users.remove(id) {
            Some(_) => Ok(()),
            None => Err(UserStoreError::UserNotFound),
        }
    }
}
