use actix_web::{http::Method, web, HttpRequest, HttpResponse, Resource};
use futures_util::StreamExt;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{
    db::SessionStore,
    error::{Result, SessionsError},
};

pub const SESSIONS_PATH: &str = "/sessions";

/// Largest request body, in bytes, accepted as a trackers payload.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub id: Option<String>,
}

impl SessionQuery {
    /// An empty `id=` counts as absent.
    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct SessionTrackersResponse {
    pub trackers: String,
}

#[derive(Debug, Serialize)]
pub struct SessionIdResponse {
    pub id: String,
}

fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|source| SessionsError::InvalidId {
        id: id.to_string(),
        source,
    })
}

/// Collects the whole body before anything is stored, failing once it grows
/// past `limit`.
async fn read_body(mut payload: web::Payload, limit: usize) -> Result<String> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > limit {
            return Err(SessionsError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8(body.to_vec())?)
}

/// `/sessions` answers GET and POST; anything else gets a 405 with `Allow`.
pub fn resource() -> Resource {
    web::resource(SESSIONS_PATH)
        .route(web::get().to(get_session))
        .route(web::post().to(post_session))
        .default_service(web::to(method_not_allowed))
}

pub async fn get_session(
    query: web::Query<SessionQuery>,
    store: web::Data<dyn SessionStore>,
) -> Result<HttpResponse> {
    let id = query.id().ok_or(SessionsError::MissingId(Method::GET))?;
    let object_id = parse_id(id)?;

    let session = store
        .find_by_id(&object_id)
        .await?
        .ok_or_else(|| SessionsError::NotFound(object_id.to_hex()))?;

    log::info!("Fetched session {}", object_id.to_hex());

    Ok(HttpResponse::Ok().json(SessionTrackersResponse {
        trackers: session.trackers,
    }))
}

pub async fn post_session(
    query: web::Query<SessionQuery>,
    payload: web::Payload,
    limit: web::Data<BodyLimit>,
    store: web::Data<dyn SessionStore>,
) -> Result<HttpResponse> {
    let requested = query
        .id()
        .map(|id| parse_id(id).map(|object_id| (id, object_id)))
        .transpose()?;
    let trackers = read_body(payload, limit.0).await?;

    let id = match requested {
        None => {
            let id = store.insert(trackers).await?.to_hex();
            log::info!("Created session {}", id);
            id
        }
        Some((id, object_id)) => {
            if !store.replace_by_id(&object_id, trackers).await? {
                return Err(SessionsError::NotFound(id.to_string()));
            }
            log::info!("Replaced trackers of session {}", id);
            // Echo the id exactly as the client sent it.
            id.to_string()
        }
    };

    Ok(HttpResponse::Ok().json(SessionIdResponse { id }))
}

pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse> {
    Err(SessionsError::MethodNotAllowed(req.method().clone()))
}
