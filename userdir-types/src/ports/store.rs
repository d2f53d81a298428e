//! Account store port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (SQLite, InMemory) will implement this trait.

use crate::domain::{Money, User, UserId};
use crate::dto::{CreateUserRequest, UpdateUserRequest};
use crate::error::StoreError;

/// Keyed record store for user accounts.
///
/// A missing account is always surfaced as `None` / `NotFound`; the store
/// never substitutes a default balance for an absent record. Serialization
/// of concurrent read-modify-write cycles is the transfer engine's
/// responsibility; the store's only multi-account guarantee is that
/// `set_balances` commits both writes as one unit.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // User record operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a new user, assigning its id.
    async fn create_user(&self, req: CreateUserRequest) -> Result<User, StoreError>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Lists all users.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Updates a user's profile fields, leaving the balance untouched.
    /// Returns the updated user, or `None` if the id is unknown.
    async fn update_user(
        &self,
        id: UserId,
        req: UpdateUserRequest,
    ) -> Result<Option<User>, StoreError>;

    /// Deletes a user. Returns false if the id was unknown.
    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Balance primitives (consumed by the transfer engine)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Reads a single balance. `None` when the account does not exist.
    async fn get_balance(&self, id: UserId) -> Result<Option<Money>, StoreError>;

    /// Writes a single balance. Fails with `NotFound` for an unknown account.
    async fn set_balance(&self, id: UserId, value: Money) -> Result<(), StoreError>;

    /// Writes two balances in one atomic commit. No reader sees one write
    /// without the other. Fails with `NotFound`, writing neither, if either
    /// account is unknown.
    async fn set_balances(
        &self,
        first: (UserId, Money),
        second: (UserId, Money),
    ) -> Result<(), StoreError>;
}
