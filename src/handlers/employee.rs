use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::errors::AppError;
use crate::models::employee::EmployeeInput;
use crate::store::EmployeeStore;

fn parse_employee_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("Invalid employee ID".to_string()))
}

pub async fn get_employees(
    store: web::Data<dyn EmployeeStore>,
) -> Result<HttpResponse, AppError> {
    let employees = store.list().await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn create_employee(
    store: web::Data<dyn EmployeeStore>,
    new_employee: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    let input = new_employee.trimmed();
    input.validate()?;

    let employee = store.create(&input).await?;
    log::debug!("Created employee {}", employee.id);

    Ok(HttpResponse::Created().json(employee))
}

pub async fn update_employee(
    store: web::Data<dyn EmployeeStore>,
    employee_id: web::Path<String>,
    updates: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    let employee_id = parse_employee_id(&employee_id.into_inner())?;
    let input = updates.trimmed();
    input.validate()?;

    match store.update(employee_id, &input).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(AppError::NotFound("Employee not found".to_string())),
    }
}

pub async fn delete_employee(
    store: web::Data<dyn EmployeeStore>,
    employee_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = parse_employee_id(&employee_id.into_inner())?;

    if !store.delete(employee_id).await? {
        log::debug!("Delete of missing employee {} acknowledged", employee_id);
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}
