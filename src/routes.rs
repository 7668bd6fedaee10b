//! HTTP handlers and error-response shaping.

use actix_web::error::JsonPayloadError;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use serde_json::{json, Value};

use crate::schema::{self, FieldError};
use crate::service::InferenceService;

/// Liveness probe.
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({"message": "API is running!"}))
}

/// Per-request pipeline: validate → map → scale → predict ×3 → range-check.
/// Every failure is deterministic for a given body and artifact set, so no
/// stage is retried.
#[post("/predict")]
pub async fn predict(
    service: web::Data<InferenceService>,
    body: web::Json<Value>,
) -> impl Responder {
    let request = match schema::validate(&body) {
        Ok(request) => request,
        Err(errors) => {
            error!("Request validation error: {errors:?}");
            return HttpResponse::UnprocessableEntity().json(validation_error_body(&errors));
        }
    };

    info!(
        "Received prediction request for student with Age: {}, Gender: {}",
        request.age, request.gender
    );

    // Inference is CPU-bound; keep it off the async workers.
    match web::block(move || service.predict(&request)).await {
        Ok(Ok(prediction)) => {
            info!("Prediction result: {}", json!(prediction));
            HttpResponse::Ok().json(prediction)
        }
        Ok(Err(fault)) => {
            error!("Prediction pipeline fault: {fault}");
            HttpResponse::InternalServerError().json(server_error_body())
        }
        Err(blocking) => {
            error!("Blocking execution failed: {blocking}");
            HttpResponse::InternalServerError().json(server_error_body())
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root).service(predict);
}

/// JSON extractor configuration shared by the server and the test harness.
/// Malformed bodies are a client fault and must answer 422, never 400/500.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = FieldError::new("body", format!("JSON decode error: {err}"), "json_error");
    let response = HttpResponse::UnprocessableEntity().json(validation_error_body(&[detail]));
    actix_web::error::InternalError::from_response(err, response).into()
}

fn validation_error_body(errors: &[FieldError]) -> Value {
    json!({
        "error": "Request Validation Error",
        "details": errors,
        "type": "validation_error",
    })
}

/// Opaque 500 body. Internal detail stays in the log, never in the response.
fn server_error_body() -> Value {
    json!({
        "error": "Internal Server Error",
        "message": "An unexpected error occurred during prediction",
        "type": "server_error",
    })
}
