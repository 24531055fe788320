use sqlx::SqlitePool;

use crate::models::User;

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, avatar, role, password_hash, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, avatar, role, password_hash, created_at
        FROM users
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Insert a bootstrap user, or refresh the role and password of an existing
/// user with the same name. Used only at startup from the users file.
pub async fn upsert_bootstrap_user(
    pool: &SqlitePool,
    name: &str,
    role: &str,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, role, password_hash, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET
            role = excluded.role,
            password_hash = excluded.password_hash
        "#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(name)
    .bind(role)
    .bind(password_hash)
    .bind(super::now_utc())
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use anyhow::Result;

    use crate::db::test_util::memory_pool;

    use super::{find_by_id, find_by_name, upsert_bootstrap_user};

    #[tokio::test]
    async fn upsert_keeps_id_and_refreshes_credentials() -> Result<()> {
        let pool = memory_pool().await?;

        upsert_bootstrap_user(&pool, "alice", "user", "hash1").await?;
        let first = find_by_name(&pool, "alice").await?.unwrap();

        upsert_bootstrap_user(&pool, "alice", "admin", "hash2").await?;
        let second = find_by_name(&pool, "alice").await?.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.role, "admin");
        assert_eq!(second.password_hash, "hash2");
        assert!(find_by_id(&pool, &second.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn find_by_name_returns_none_for_unknown_user() -> Result<()> {
        let pool = memory_pool().await?;
        assert!(find_by_name(&pool, "nobody").await?.is_none());
        Ok(())
    }
}
