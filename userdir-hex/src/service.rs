//! Directory Application Service
//!
//! Orchestrates domain operations through the account store port.
//! Contains NO infrastructure logic - pure business orchestration.

use std::sync::Arc;

use userdir_types::{
    AccountStore, AppError, CreateUserRequest, PaymentRequest, TransferReceipt, UpdateUserRequest,
    User, UserId,
};

use crate::engine::TransferEngine;

/// Application service for the user directory.
///
/// Generic over `S: AccountStore` - the adapter is injected at compile time.
/// This enables:
/// - Swapping stores without code changes
/// - Testing with an in-memory store
/// - Compile-time checks for port implementation
pub struct DirectoryService<S: AccountStore> {
    store: Arc<S>,
    engine: TransferEngine<S>,
}

impl<S: AccountStore> DirectoryService<S> {
    /// Creates a new directory service with the given store.
    pub fn new(store: S) -> Self {
        let store = Arc::new(store);
        let engine = TransferEngine::new(store.clone());
        Self { store, engine }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // User record operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a new user.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User, AppError> {
        User::validate_profile(&req.first_name, &req.email)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if req.initial_balance < 0 {
            return Err(AppError::BadRequest(
                "Initial balance cannot be negative".into(),
            ));
        }

        self.store.create_user(req).await.map_err(Into::into)
    }

    /// Gets a user by ID.
    pub async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        self.store
            .get_user(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("User {}", id))))
    }

    /// Lists all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.store.list_users().await.map_err(Into::into)
    }

    /// Updates a user's profile fields. The balance is never written here.
    pub async fn update_user(&self, id: UserId, req: UpdateUserRequest) -> Result<User, AppError> {
        User::validate_profile(&req.first_name, &req.email)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        self.store
            .update_user(id, req)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("User {}", id))))
    }

    /// Deletes a user.
    pub async fn delete_user(&self, id: UserId) -> Result<(), AppError> {
        let deleted = self.store.delete_user(id).await?;
        if deleted {
            self.engine.forget_account(id);
            Ok(())
        } else {
            Err(AppError::NotFound(format!("User {}", id)))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transfers
    // ─────────────────────────────────────────────────────────────────────────────

    /// Moves funds from the giver to the taker through the transfer engine.
    pub async fn transfer(&self, req: PaymentRequest) -> Result<TransferReceipt, AppError> {
        self.engine.transfer(req).await.map_err(Into::into)
    }
}
