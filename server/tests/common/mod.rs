#![allow(dead_code)]

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tracker_sessions::db::{Session, SessionStore};
use tracker_sessions::error::{Result, SessionsError};

/// Store whose every call fails as if the database could not be reached.
/// Any request that should never touch the store would surface as a 500.
pub struct UnreachableStore;

fn unavailable<T>() -> Result<T> {
    Err(SessionsError::StoreUnavailable(
        "no reachable servers".to_string(),
    ))
}

#[async_trait]
impl SessionStore for UnreachableStore {
    fn backend(&self) -> &'static str {
        "unreachable"
    }

    async fn find_by_id(&self, _id: &ObjectId) -> Result<Option<Session>> {
        unavailable()
    }

    async fn insert(&self, _trackers: String) -> Result<ObjectId> {
        unavailable()
    }

    async fn replace_by_id(&self, _id: &ObjectId, _trackers: String) -> Result<bool> {
        unavailable()
    }

    async fn ping(&self) -> Result<()> {
        unavailable()
    }
}

pub fn is_object_id_hex(id: &str) -> bool {
    id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit())
}
