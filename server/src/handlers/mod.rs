pub mod health;
pub mod sessions;

pub use health::health_check;
pub use sessions::{get_session, method_not_allowed, post_session, BodyLimit, SESSIONS_PATH};

use actix_web::{error::InternalError, web, HttpResponse};
use std::sync::Arc;

use crate::db::SessionStore;

/// Registers every route together with the shared store and extractor
/// limits. Used by `main` and by the integration tests alike.
pub fn configure(cfg: &mut web::ServiceConfig, store: Arc<dyn SessionStore>, max_body_bytes: usize) {
    cfg.app_data(web::Data::from(store))
        .app_data(web::Data::new(BodyLimit(max_body_bytes)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            log::warn!("Rejected query string: {}", err);
            InternalError::from_response(err, HttpResponse::BadRequest().finish()).into()
        }))
        .service(health_check)
        .service(sessions::resource());
}
