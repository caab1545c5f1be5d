use async_trait::async_trait;
use sqlx::PgPool;

use super::{EmployeeStore, StoreError};
use crate::models::employee::{Employee, EmployeeInput};

pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, name, email, department, created_at FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    async fn create(&self, input: &EmployeeInput) -> Result<Employee, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (name, email, department) VALUES ($1, $2, $3) \
             RETURNING id, name, email, department, created_at",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.department)
        .fetch_one(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn update(
        &self,
        id: i32,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            "UPDATE employees SET name = $1, email = $2, department = $3 WHERE id = $4 \
             RETURNING id, name, email, department, created_at",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.department)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
