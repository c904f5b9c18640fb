use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::dto::CreateUserRequest;
use super::error::{RepoError, UserError, UserResult};
use super::password::{hash_password, verify_password};
use super::repo::UserStore;
use super::repo_types::{User, UserChanges};
use super::validation::{validate, validate_changes, validate_new_password};

/// Business rules around the user store: existence checks, validation,
/// id generation and password hashing.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn exists(&self, username: &str) -> bool {
        self.store.exists(username).await
    }

    async fn ensure_exists(&self, username: &str) -> UserResult<()> {
        if !self.exists(username).await {
            debug!(%username, "user not found");
            return Err(UserError::UserNotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create(&self, input: CreateUserRequest) -> UserResult<User> {
        // Handlers look users up by the trimmed path segment
        let input = CreateUserRequest {
            name: trimmed(input.name),
            surname: trimmed(input.surname),
            username: trimmed(input.username),
            email: trimmed(input.email),
            password: input.password,
        };
        validate(&input)?;

        if self.exists(&input.username).await {
            warn!("username already registered");
            return Err(UserError::UserAlreadyExists);
        }

        let password_hash = hash_password(&input.password)?;
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            surname: input.surname,
            username: input.username,
            email: input.email,
            password_hash,
        };

        match self.store.save(&user).await {
            Ok(()) => {}
            // Lost the race against a concurrent create
            Err(RepoError::Conflict) => return Err(UserError::UserAlreadyExists),
            Err(RepoError::EmailConflict) => return Err(UserError::EmailAlreadyInUse),
            Err(e) => return Err(UserError::CreateFailed(e)),
        }

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, username: &str) -> UserResult<User> {
        self.store.search(username).await.map_err(|e| match e {
            RepoError::NotFound => UserError::UserNotFound,
            e => UserError::SearchFailed(e),
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, username: &str) -> UserResult<()> {
        self.ensure_exists(username).await?;

        self.store.delete(username).await.map_err(|e| match e {
            RepoError::NotFound => UserError::UserNotFound,
            e => UserError::DeleteFailed(e),
        })?;

        info!("user deleted");
        Ok(())
    }

    /// Applies name/surname/email changes and returns the merged record.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, username: &str, changes: UserChanges) -> UserResult<User> {
        self.ensure_exists(username).await?;
        let changes = UserChanges {
            name: changes.name.map(trimmed),
            surname: changes.surname.map(trimmed),
            email: changes.email.map(trimmed),
        };
        validate_changes(&changes)?;

        let current = self.search(username).await?;
        if changes.is_empty() {
            return Ok(current);
        }

        self.store
            .update(username, &changes)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => UserError::UserNotFound,
                RepoError::Conflict | RepoError::EmailConflict => UserError::EmailAlreadyInUse,
                e => UserError::UpdateFailed(e),
            })?;

        info!(user_id = %current.id, "user updated");
        Ok(current.merged(&changes))
    }

    #[instrument(skip(self, new_password))]
    pub async fn change_password(&self, username: &str, new_password: &str) -> UserResult<()> {
        self.ensure_exists(username).await?;
        validate_new_password(new_password)?;

        let new_hash = hash_password(new_password)?;
        self.store
            .change_password(username, &new_hash)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => UserError::UserNotFound,
                e => UserError::ChangePasswordFailed(e),
            })?;

        info!("password changed");
        Ok(())
    }

    /// Compares `plain` against the stored hash for `username`.
    #[instrument(skip(self, plain))]
    pub async fn verify_password(&self, username: &str, plain: &str) -> UserResult<bool> {
        let user = self.search(username).await?;
        verify_password(plain, &user.password_hash)
    }
}

fn trimmed(s: String) -> String {
    s.trim().to_string()
}
