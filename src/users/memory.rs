use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::RepoError;
use super::repo::UserStore;
use super::repo_types::{User, UserChanges};

/// In-memory `UserStore` with the same uniqueness rules as the users table.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    // Existence check always answers "absent", as in a lost check-then-act race
    blind_exists: bool,
    // Writes fail with a driver error
    broken_writes: bool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blind_exists(mut self) -> Self {
        self.blind_exists = true;
        self
    }

    pub fn with_broken_writes(mut self) -> Self {
        self.broken_writes = true;
        self
    }

    fn check_writable(&self) -> Result<(), RepoError> {
        if self.broken_writes {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn email_taken(users: &HashMap<String, User>, email: &str, except: &str) -> bool {
    users
        .values()
        .any(|u| u.username != except && u.email == email)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn exists(&self, username: &str) -> bool {
        !self.blind_exists && self.users.read().await.contains_key(username)
    }

    async fn search(&self, username: &str) -> Result<User, RepoError> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        self.check_writable()?;
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(RepoError::Conflict);
        }
        if email_taken(&users, &user.email, "") {
            return Err(RepoError::EmailConflict);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<(), RepoError> {
        self.check_writable()?;
        self.users
            .write()
            .await
            .remove(username)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, username: &str, fields: &UserChanges) -> Result<(), RepoError> {
        self.check_writable()?;
        let mut users = self.users.write().await;
        if let Some(email) = &fields.email {
            if email_taken(&users, email, username) {
                return Err(RepoError::EmailConflict);
            }
        }
        let user = users.get_mut(username).ok_or(RepoError::NotFound)?;
        *user = user.merged(fields);
        Ok(())
    }

    async fn change_password(&self, username: &str, new_hash: &str) -> Result<(), RepoError> {
        self.check_writable()?;
        let mut users = self.users.write().await;
        let user = users.get_mut(username).ok_or(RepoError::NotFound)?;
        user.password_hash = new_hash.to_string();
        Ok(())
    }
}
