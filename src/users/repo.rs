use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use super::error::RepoError;
use super::repo_types::{User, UserChanges};

const EXISTS_USER_QUERY: &str = r#"SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)"#;

const SEARCH_USER_QUERY: &str = r#"
    SELECT id, name, surname, username, email, password
    FROM users
    WHERE username = $1
"#;

const SAVE_USER_QUERY: &str = r#"
    INSERT INTO users (id, name, surname, username, email, password)
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

const DELETE_USER_QUERY: &str = r#"DELETE FROM users WHERE username = $1"#;

const UPDATE_USER_QUERY: &str = r#"
    UPDATE users
    SET name = COALESCE($1, name),
        surname = COALESCE($2, surname),
        email = COALESCE($3, email)
    WHERE username = $4
"#;

const CHANGE_PASSWORD_QUERY: &str = r#"UPDATE users SET password = $1 WHERE username = $2"#;

/// Single-table access to stored users, keyed by username.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `false` on lookup errors as well as on absence.
    async fn exists(&self, username: &str) -> bool;
    async fn search(&self, username: &str) -> Result<User, RepoError>;
    async fn save(&self, user: &User) -> Result<(), RepoError>;
    async fn delete(&self, username: &str) -> Result<(), RepoError>;
    /// Writes the provided name, surname and email; `None` keeps the stored
    /// value. Username, id and password are untouched.
    async fn update(&self, username: &str, fields: &UserChanges) -> Result<(), RepoError>;
    async fn change_password(&self, username: &str, new_hash: &str) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn expect_row(rows_affected: u64) -> Result<(), RepoError> {
    if rows_affected == 0 {
        return Err(RepoError::NotFound);
    }
    Ok(())
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn exists(&self, username: &str) -> bool {
        match sqlx::query_scalar::<_, bool>(EXISTS_USER_QUERY)
            .bind(username)
            .fetch_one(&self.db)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, %username, "existence check failed");
                false
            }
        }
    }

    async fn search(&self, username: &str) -> Result<User, RepoError> {
        let user = sqlx::query_as::<_, User>(SEARCH_USER_QUERY)
            .bind(username)
            .fetch_optional(&self.db)
            .await
            .map_err(RepoError::from_scan)?
            .ok_or(RepoError::NotFound)?;
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(SAVE_USER_QUERY)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.surname)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&self.db)
            .await
            .map_err(RepoError::from_sqlx)?;
        debug!(user_id = %user.id, username = %user.username, "user row inserted");
        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<(), RepoError> {
        let res = sqlx::query(DELETE_USER_QUERY)
            .bind(username)
            .execute(&self.db)
            .await
            .map_err(RepoError::from_sqlx)?;
        expect_row(res.rows_affected())
    }

    async fn update(&self, username: &str, fields: &UserChanges) -> Result<(), RepoError> {
        let res = sqlx::query(UPDATE_USER_QUERY)
            .bind(&fields.name)
            .bind(&fields.surname)
            .bind(&fields.email)
            .bind(username)
            .execute(&self.db)
            .await
            .map_err(RepoError::from_sqlx)?;
        expect_row(res.rows_affected())
    }

    async fn change_password(&self, username: &str, new_hash: &str) -> Result<(), RepoError> {
        let res = sqlx::query(CHANGE_PASSWORD_QUERY)
            .bind(new_hash)
            .bind(username)
            .execute(&self.db)
            .await
            .map_err(RepoError::from_sqlx)?;
        expect_row(res.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_parameterized() {
        for q in [
            EXISTS_USER_QUERY,
            SEARCH_USER_QUERY,
            SAVE_USER_QUERY,
            DELETE_USER_QUERY,
            UPDATE_USER_QUERY,
            CHANGE_PASSWORD_QUERY,
        ] {
            assert!(q.contains("$1"), "{q}");
            assert!(!q.contains('?'), "{q}");
        }
        assert!(SAVE_USER_QUERY.contains("$6"));
        assert!(UPDATE_USER_QUERY.contains("WHERE username = $4"));
    }

    #[test]
    fn update_never_touches_identity_or_password() {
        let set_clause = UPDATE_USER_QUERY.split("WHERE").next().unwrap();
        assert!(!set_clause.contains("password"));
        assert!(!set_clause.contains("username"));
        assert!(!set_clause.contains(" id"));
    }

    #[test]
    fn zero_rows_affected_is_not_found() {
        assert!(matches!(expect_row(0), Err(RepoError::NotFound)));
        assert!(expect_row(1).is_ok());
    }
}
