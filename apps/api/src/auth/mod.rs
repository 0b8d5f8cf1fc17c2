//! Credential store — the only durable state in the system.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::errors::AppError;

pub mod handlers;
pub mod password;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub email: String,
}

/// Inserts a new credential row. Duplicate usernames surface as
/// `CredentialConflict`, mapped from the unique-key violation.
pub async fn register_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    display_name: &str,
    email: &str,
) -> Result<(), AppError> {
    let hash = password::hash_password(password);
    sqlx::query(
        "INSERT INTO users (username, password_hash, display_name, email) VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(&hash)
    .bind(display_name)
    .bind(email)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::CredentialConflict(username.to_string())
        }
        _ => AppError::Database(e),
    })?;
    Ok(())
}

/// Verifies a username/password pair against the credential table.
/// Unknown usernames and bad passwords fail identically.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::AuthenticationFailed)?;

    if !password::verify_password(password, &user.password_hash) {
        return Err(AppError::AuthenticationFailed);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/test.db", dir.path().display());
        let pool = create_pool(&url).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let (_dir, pool) = test_pool().await;
        register_user(&pool, "camilo", "secret", "Camilo G.", "c@example.com")
            .await
            .unwrap();

        let user = authenticate(&pool, "camilo", "secret").await.unwrap();
        assert_eq!(user.display_name, "Camilo G.");
        assert_eq!(user.email, "c@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let (_dir, pool) = test_pool().await;
        register_user(&pool, "camilo", "secret", "Camilo", "c@example.com")
            .await
            .unwrap();

        let err = register_user(&pool, "camilo", "other", "Other", "o@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CredentialConflict(u) if u == "camilo"));
    }

    #[tokio::test]
    async fn test_bad_password_and_unknown_user_fail_alike() {
        let (_dir, pool) = test_pool().await;
        register_user(&pool, "camilo", "secret", "Camilo", "c@example.com")
            .await
            .unwrap();

        let wrong = authenticate(&pool, "camilo", "nope").await.unwrap_err();
        let unknown = authenticate(&pool, "ghost", "secret").await.unwrap_err();
        assert!(matches!(wrong, AppError::AuthenticationFailed));
        assert!(matches!(unknown, AppError::AuthenticationFailed));
    }
}
