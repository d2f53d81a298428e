//! Database row types for the SQLite adapter.

use sqlx::FromRow;

use userdir_types::{Money, StoreError, User, UserId};

/// User row from the database.
#[derive(FromRow)]
pub struct DbUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub balance: i64,
    pub created_at: String,
}

impl DbUser {
    /// Convert database row to domain User.
    pub fn into_domain(self) -> Result<User, StoreError> {
        let balance = Money::new(self.balance).map_err(StoreError::Domain)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .with_timezone(&chrono::Utc);

        Ok(User::from_parts(
            UserId::new(self.id),
            self.first_name,
            self.last_name,
            self.email,
            self.password,
            balance,
            created_at,
        ))
    }
}

/// Balance-only row for queries.
#[derive(FromRow)]
pub struct DbBalance {
    pub balance: i64,
}
