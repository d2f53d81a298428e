//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{User, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// User DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Opening balance in smallest currency unit; defaults to zero
    #[serde(default)]
    pub initial_balance: i64,
}

/// Request to update a user's profile fields.
///
/// Deliberately has no balance field: balances change only through the
/// transfer engine's commit path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// A user as returned by the API. Never carries the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Current balance in smallest currency unit
    pub balance: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            balance: user.balance.amount(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transfer DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to move funds from the giver to the taker.
///
/// Ephemeral value object: created per call, never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Account receiving the funds
    pub taker_id: UserId,
    /// Account the funds are taken from
    pub giver_id: UserId,
    /// Amount to transfer in smallest currency unit
    pub amount: i64,
}

/// Outcome of a committed transfer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub taker_id: UserId,
    pub giver_id: UserId,
    /// Taker's balance after the transfer
    pub taker_balance: i64,
    /// Giver's balance after the transfer
    pub giver_balance: i64,
}
