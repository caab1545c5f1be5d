use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{EmployeeStore, StoreError};
use crate::models::employee::{Employee, EmployeeInput};

/// In-process table with SERIAL-like ids: they start at 1 and are never
/// reused, even after a delete.
#[derive(Default)]
pub struct MemoryEmployeeStore {
    inner: Mutex<Table>,
}

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: Vec<Employee>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let table = self.inner.lock().await;
        Ok(table.rows.clone())
    }

    async fn create(&self, input: &EmployeeInput) -> Result<Employee, StoreError> {
        let mut table = self.inner.lock().await;
        table.last_id += 1;
        let employee = Employee {
            id: table.last_id,
            name: input.name.clone(),
            email: input.email.clone(),
            department: input.department.clone(),
            created_at: Utc::now(),
        };
        table.rows.push(employee.clone());
        Ok(employee)
    }

    async fn update(
        &self,
        id: i32,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, StoreError> {
        let mut table = self.inner.lock().await;
        let Some(row) = table.rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        row.name = input.name.clone();
        row.email = input.email.clone();
        row.department = input.department.clone();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut table = self.inner.lock().await;
        let before = table.rows.len();
        table.rows.retain(|row| row.id != id);
        Ok(table.rows.len() < before)
    }
}
