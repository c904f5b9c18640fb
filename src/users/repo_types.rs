use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
}

/// Fields a client may change on an existing user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none() && self.email.is_none()
    }
}

impl User {
    /// Returns a copy with the provided changes applied. Identity and
    /// credentials are never touched.
    pub fn merged(&self, changes: &UserChanges) -> User {
        User {
            id: self.id,
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            surname: changes
                .surname
                .clone()
                .unwrap_or_else(|| self.surname.clone()),
            username: self.username.clone(),
            email: changes.email.clone().unwrap_or_else(|| self.email.clone()),
            password_hash: self.password_hash.clone(),
        }
    }
}
