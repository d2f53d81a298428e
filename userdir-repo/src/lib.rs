//! # Userdir Repo
//!
//! Concrete account store implementations (adapters) for the user
//! directory service. This crate provides adapters that implement the
//! `AccountStore` port: an always-available in-memory store and a
//! feature-gated SQLite store.

use async_trait::async_trait;
use userdir_types::{
    AccountStore, CreateUserRequest, Money, StoreError, UpdateUserRequest, User, UserId,
};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
mod types;


pub use memory::MemoryRepo;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepo;

/// Unified store wrapper over whichever adapter the build enables.
pub struct Repo {
    #[cfg(feature = "sqlite")]
    inner: sqlite::SqliteRepo,
    #[cfg(not(feature = "sqlite"))]
    inner: memory::MemoryRepo,
}

/// Build and initialize an account store.
///
/// With the `sqlite` feature this connects to `database_url`, runs the
/// migration, and returns a durable store. Without it, an in-memory store
/// is returned and `database_url` is ignored.
pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::new(database_url).await
}

impl Repo {
    #[cfg(not(feature = "sqlite"))]
    pub async fn new(database_url: Option<&str>) -> anyhow::Result<Self> {
        if database_url.is_some() {
            tracing::warn!("DATABASE_URL is set but this build uses the in-memory store");
        }
        Ok(Self {
            inner: memory::MemoryRepo::new(),
        })
    }

    #[cfg(feature = "sqlite")]
    pub async fn new(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the sqlite store"))?;
        let inner = sqlite::SqliteRepo::new(url).await?;
        Ok(Self { inner })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement AccountStore for Repo (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AccountStore for Repo {
    async fn create_user(&self, req: CreateUserRequest) -> Result<User, StoreError> {
        self.inner.create_user(req).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.inner.get_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.list_users().await
    }

    async fn update_user(
        &self,
        id: UserId,
        req: UpdateUserRequest,
    ) -> Result<Option<User>, StoreError> {
        self.inner.update_user(id, req).await
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        self.inner.delete_user(id).await
    }

    async fn get_balance(&self, id: UserId) -> Result<Option<Money>, StoreError> {
        self.inner.get_balance(id).await
    }

    async fn set_balance(&self, id: UserId, value: Money) -> Result<(), StoreError> {
        self.inner.set_balance(id, value).await
    }

    async fn set_balances(
        &self,
        first: (UserId, Money),
        second: (UserId, Money),
    ) -> Result<(), StoreError> {
        self.inner.set_balances(first, second).await
    }
}
