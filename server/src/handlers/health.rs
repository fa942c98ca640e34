use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{db::SessionStore, error::Result};

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub store: String,
}

#[get("/health")]
pub async fn health_check(store: web::Data<dyn SessionStore>) -> Result<HttpResponse> {
    let backend = store.backend().to_string();

    match store.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(HealthCheckResponse {
            status: "healthy".to_string(),
            store: backend,
        })),
        Err(err) => {
            log::warn!("Health check failed, {} store unreachable: {}", backend, err);
            Ok(HttpResponse::ServiceUnavailable().json(HealthCheckResponse {
                status: "degraded".to_string(),
                store: backend,
            }))
        }
    }
}
