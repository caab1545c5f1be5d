use async_trait::async_trait;
use thiserror::Error;

use crate::models::employee::{Employee, EmployeeInput};

mod memory;
mod postgres;

pub use memory::MemoryEmployeeStore;
pub use postgres::PgEmployeeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The four operations over the `employees` table. Every call is a single
/// statement; there is no locking, so the last writer wins.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// All rows ordered by id.
    async fn list(&self) -> Result<Vec<Employee>, StoreError>;

    async fn create(&self, input: &EmployeeInput) -> Result<Employee, StoreError>;

    /// Overwrites name, email and department. `None` when `id` does not exist.
    async fn update(&self, id: i32, input: &EmployeeInput)
        -> Result<Option<Employee>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}
