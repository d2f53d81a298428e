//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::error::DomainError;

/// Unique identifier for a User.
///
/// Integer identity assigned by the account store on creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a UserId from a raw integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A directory user holding a monetary balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the store
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Stored credential, never exposed through the API
    pub password: String,
    /// Current balance in smallest currency unit
    pub balance: Money,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Validates the profile fields of a prospective user.
    ///
    /// # Validation
    /// - First name cannot be empty
    /// - Email must be non-empty and contain an `@`
    pub fn validate_profile(first_name: &str, email: &str) -> Result<(), DomainError> {
        if first_name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "First name cannot be empty".into(),
            ));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::ValidationError(format!(
                "Invalid email address: {:?}",
                email
            )));
        }
        Ok(())
    }

    /// Creates a user with all fields specified (for store reconstruction).
    pub fn from_parts(
        id: UserId,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        balance: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            password,
            balance,
            created_at,
        }
    }

    /// Credits (adds) money to the user's balance.
    pub fn credit(&mut self, amount: Money) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Debits (subtracts) money from the user's balance.
    pub fn debit(&mut self, amount: Money) -> Result<(), DomainError> {
        self.balance = self.balance.checked_sub(amount)?;
        Ok(())
    }

    /// Checks if the user has sufficient funds for a debit.
    pub fn has_sufficient_funds(&self, amount: &Money) -> bool {
        self.balance.gte(amount)
    }
}
