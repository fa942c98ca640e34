use actix_web::{
    error::ResponseError,
    http::{header, Method, StatusCode},
    HttpResponse,
};
use mongodb::error::ErrorKind;

/// Methods served by the sessions resource, in `Allow` header order.
pub const ALLOWED_METHODS: [Method; 2] = [Method::GET, Method::POST];

#[derive(Debug, thiserror::Error)]
pub enum SessionsError {
    #[error("Id missing from {0} request")]
    MissingId(Method),

    #[error("Failed to create ObjectId from id '{id}': {source}")]
    InvalidId {
        id: String,
        #[source]
        source: mongodb::bson::oid::Error,
    },

    #[error("Request body is not valid UTF-8: {0}")]
    InvalidBody(#[from] std::string::FromUtf8Error),

    #[error("Request body exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    #[error("Failed to read request body: {0}")]
    Payload(#[from] actix_web::error::PayloadError),

    #[error("No session found for id '{0}'")]
    NotFound(String),

    #[error("Unsupported HTTP method used: {0}")]
    MethodNotAllowed(Method),

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Session store error: {0}")]
    Store(#[source] mongodb::error::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for SessionsError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { message, .. } => {
                SessionsError::StoreUnavailable(message.clone())
            }
            _ => SessionsError::Store(err),
        }
    }
}

fn allow_header_value() -> String {
    ALLOWED_METHODS
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

impl ResponseError for SessionsError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionsError::MissingId(_) => StatusCode::BAD_REQUEST,
            SessionsError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            SessionsError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            SessionsError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SessionsError::Payload(_) => StatusCode::BAD_REQUEST,
            SessionsError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionsError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            SessionsError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionsError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Details stay in the server log; clients only see the status.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }

        let mut response = HttpResponse::build(status);
        if let SessionsError::MethodNotAllowed(_) = self {
            response.insert_header((header::ALLOW, allow_header_value()));
        }
        response.finish()
    }
}

pub type Result<T> = std::result::Result<T, SessionsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_allow_header_lists_get_and_post() {
        assert_eq!(allow_header_value(), "GET,POST");
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let invalid = ObjectId::parse_str("not-a-valid-id").unwrap_err();
        let err = SessionsError::InvalidId {
            id: "not-a-valid-id".to_string(),
            source: invalid,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            SessionsError::MissingId(Method::GET).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_store_errors_are_server_errors() {
        assert_eq!(
            SessionsError::StoreUnavailable("no servers".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SessionsError::Internal("bad id".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_has_empty_body() {
        let response = SessionsError::NotFound("abc".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().try_into_bytes().unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_payload_too_large_has_empty_body() {
        let response = SessionsError::PayloadTooLarge(16).error_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = response.into_body().try_into_bytes().unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = SessionsError::MethodNotAllowed(Method::DELETE).error_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(header::ALLOW).unwrap(),
            "GET,POST"
        );
    }
}
