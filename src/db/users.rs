//! Users repository
//!
//! Users carry no password; credentials are checked by the auth service.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sqlite_helpers::{new_id, now_iso8601};
use super::{MIN_USERNAME_LEN, StoreResult, map_write_error, require_min_len};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub favourite_genre: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub favourite_genre: String,
}

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user; usernames are unique
    pub async fn create(&self, user: CreateUser) -> StoreResult<UserRecord> {
        require_min_len("username", &user.username, MIN_USERNAME_LEN)?;

        let record = UserRecord {
            id: new_id(),
            username: user.username.trim().to_string(),
            favourite_genre: user.favourite_genre,
            created_at: now_iso8601(),
        };

        sqlx::query(
            "INSERT INTO users (id, username, favourite_genre, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.username)
        .bind(&record.favourite_genre)
        .bind(&record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, format!("username '{}'", record.username)))?;

        Ok(record)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favourite_genre, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Get user by exact username
    pub async fn get_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favourite_genre, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
