//! In-memory account store adapter.
//!
//! Default store for local runs and the test double for the transfer
//! engine's concurrency tests. The user table lives behind a single
//! `RwLock`, so every read is a consistent snapshot and `set_balances`
//! commits both writes under one write guard. Cross-account
//! read-modify-write serialization remains the transfer engine's job,
//! per the port contract.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use userdir_types::{
    AccountStore, CreateUserRequest, Money, StoreError, UpdateUserRequest, User, UserId,
};

/// In-memory store keyed by user id, with store-assigned integer ids.
pub struct MemoryRepo {
    users: RwLock<HashMap<UserId, User>>,
    next_id: AtomicI64,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn read_users(&self) -> Result<RwLockReadGuard<'_, HashMap<UserId, User>>, StoreError> {
        self.users
            .read()
            .map_err(|_| StoreError::Database("user table lock poisoned".into()))
    }

    fn write_users(&self) -> Result<RwLockWriteGuard<'_, HashMap<UserId, User>>, StoreError> {
        self.users
            .write()
            .map_err(|_| StoreError::Database("user table lock poisoned".into()))
    }
}

impl Default for MemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryRepo {
    async fn create_user(&self, req: CreateUserRequest) -> Result<User, StoreError> {
        let balance = Money::new(req.initial_balance).map_err(StoreError::Domain)?;
        let id = UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let user = User::from_parts(
            id,
            req.first_name,
            req.last_name,
            req.email,
            req.password,
            balance,
            chrono::Utc::now(),
        );
        self.write_users()?.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read_users()?.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.read_users()?.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn update_user(
        &self,
        id: UserId,
        req: UpdateUserRequest,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.write_users()?;
        match users.get_mut(&id) {
            Some(user) => {
                user.first_name = req.first_name;
                user.last_name = req.last_name;
                user.email = req.email;
                user.password = req.password;
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self.write_users()?.remove(&id).is_some())
    }

    async fn get_balance(&self, id: UserId) -> Result<Option<Money>, StoreError> {
        Ok(self.read_users()?.get(&id).map(|u| u.balance))
    }

    async fn set_balance(&self, id: UserId, value: Money) -> Result<(), StoreError> {
        let mut users = self.write_users()?;
        match users.get_mut(&id) {
            Some(user) => {
                user.balance = value;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn set_balances(
        &self,
        first: (UserId, Money),
        second: (UserId, Money),
    ) -> Result<(), StoreError> {
        let mut users = self.write_users()?;
        if !users.contains_key(&first.0) || !users.contains_key(&second.0) {
            return Err(StoreError::NotFound);
        }
        for (id, value) in [first, second] {
            if let Some(user) = users.get_mut(&id) {
                user.balance = value;
            }
        }
        Ok(())
    }
}
