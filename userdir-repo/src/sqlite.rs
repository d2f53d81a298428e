//! SQLite account store adapter.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use userdir_types::{
    AccountStore, CreateUserRequest, Money, StoreError, UpdateUserRequest, User, UserId,
};

use crate::types::{DbBalance, DbUser};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Store
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite account store implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite store with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file
        let ddl = include_str!("../migrations/0001_create_users.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AccountStore for SqliteRepo {
    async fn create_user(&self, req: CreateUserRequest) -> Result<User, StoreError> {
        let balance = Money::new(req.initial_balance).map_err(StoreError::Domain)?;
        let now = chrono::Utc::now();
        let created_at_str = now.to_rfc3339();

        let result = sqlx::query(
            r#"INSERT INTO users (first_name, last_name, email, password, balance, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(&req.password)
        .bind(balance.amount())
        .bind(&created_at_str)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(User::from_parts(
            UserId::new(result.last_insert_rowid()),
            req.first_name,
            req.last_name,
            req.email,
            req.password,
            balance,
            now,
        ))
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT id, first_name, last_name, email, password, balance, created_at
               FROM users WHERE id = ?"#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<DbUser> = sqlx::query_as(
            r#"SELECT id, first_name, last_name, email, password, balance, created_at
               FROM users ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(DbUser::into_domain).collect()
    }

    async fn update_user(
        &self,
        id: UserId,
        req: UpdateUserRequest,
    ) -> Result<Option<User>, StoreError> {
        // Balance deliberately absent from the column list.
        let result = sqlx::query(
            r#"UPDATE users SET first_name = ?, last_name = ?, email = ?, password = ?
               WHERE id = ?"#,
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(&req.password)
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user(id).await
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = ?"#)
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_balance(&self, id: UserId) -> Result<Option<Money>, StoreError> {
        let row: Option<DbBalance> = sqlx::query_as(r#"SELECT balance FROM users WHERE id = ?"#)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(|r| Money::new(r.balance).map_err(StoreError::Domain))
            .transpose()
    }

    async fn set_balance(&self, id: UserId, value: Money) -> Result<(), StoreError> {
        let result = sqlx::query(r#"UPDATE users SET balance = ? WHERE id = ?"#)
            .bind(value.amount())
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn set_balances(
        &self,
        first: (UserId, Money),
        second: (UserId, Money),
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        for (id, value) in [first, second] {
            let result = sqlx::query(r#"UPDATE users SET balance = ? WHERE id = ?"#)
                .bind(value.amount())
                .bind(id.value())
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;

            // Dropping the transaction rolls back the first write.
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound);
            }
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}
