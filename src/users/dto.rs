use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{User, UserChanges};

pub const SUCCESS_STATUS: &str = "success";
pub const ERROR_STATUS: &str = "error";

pub const CREATE_MESSAGE: &str = "user created successfully";
pub const SEARCH_MESSAGE: &str = "user found successfully";
pub const DELETE_MESSAGE: &str = "user deleted successfully";
pub const UPDATE_MESSAGE: &str = "user updated successfully";
pub const CHANGE_PASSWORD_MESSAGE: &str = "password changed successfully";

/// Request body for user creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Partial update body. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            name: r.name,
            surname: r.surname,
            email: r.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub username: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            surname: u.surname,
            username: u.username,
            email: u.email,
        }
    }
}

/// Uniform success wrapper: `{status, message, payload?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: &'static str, payload: T) -> Self {
        Self {
            status: SUCCESS_STATUS,
            message,
            payload: Some(payload),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: &'static str) -> Self {
        Self {
            status: SUCCESS_STATUS,
            message,
            payload: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(code: &'static str, message: String) -> Self {
        Self {
            status: ERROR_STATUS,
            code,
            message,
        }
    }
}
