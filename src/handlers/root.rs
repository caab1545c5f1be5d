use actix_web::HttpResponse;
use serde_json::json;

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "API working",
    }))
}
