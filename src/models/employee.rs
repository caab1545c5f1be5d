use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /employees` and `PUT /employees/{id}`.
#[derive(Deserialize, Serialize, Validate, Debug, Clone, PartialEq, Eq)]
pub struct EmployeeInput {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(custom = "not_blank", email)]
    pub email: String,
    #[validate(custom = "not_blank")]
    pub department: String,
}

impl EmployeeInput {
    pub fn new(name: &str, email: &str, department: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            department: department.to_string(),
        }
    }

    /// Copy with surrounding whitespace stripped from every field.
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.email.trim(), self.department.trim())
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}
