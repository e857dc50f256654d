//! User operations

use crate::domain::{NewUser, User};

use super::{Repository, RepositoryError, RepositoryResult};

impl Repository {
    /// All users, ascending by id
    pub async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, username, email FROM users ORDER BY id")
            .fetch_all(self.store.pool())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to query users"))?;

        Ok(users)
    }

    /// User with the given id
    pub async fn user_by_id(&self, id: i64) -> RepositoryResult<User> {
        sqlx::query_as::<_, User>("SELECT id, username, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.store.pool())
            .await?
            .ok_or_else(|| RepositoryError::user_not_found(id))
    }

    /// Insert a user, returning its store-assigned id
    pub async fn add_user(&self, user: &NewUser) -> RepositoryResult<i64> {
        tracing::info!(username = %user.username, email = %user.email, "Adding new user");

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .fetch_one(self.store.pool())
        .await
        .inspect_err(|e| tracing::error!(username = %user.username, error = %e, "Failed to insert user"))?;

        tracing::info!(user_id = id, username = %user.username, "User created");
        Ok(id)
    }
}
