use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;

pub mod employee;
pub mod root;

/// Routes for the whole API. The store must already be registered as
/// `web::Data<dyn EmployeeStore>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::resource("/").route(web::get().to(root::root)))
        .service(
            web::resource("/employees")
                .route(web::get().to(employee::get_employees))
                .route(web::post().to(employee::create_employee)),
        )
        .service(
            web::resource("/employees/{id}")
                .route(web::put().to(employee::update_employee))
                .route(web::delete().to(employee::delete_employee)),
        );
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}
