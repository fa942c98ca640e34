//! Session persistence behind a single object-safe trait so handlers never
//! know which backend they are talking to.

mod memory;
mod models;
mod repository;

pub use memory::InMemorySessionStore;
pub use models::Session;
pub use repository::MongoSessionStore;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::Result;

#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Session>>;

    /// Stores a new session and returns its generated id.
    async fn insert(&self, trackers: String) -> Result<ObjectId>;

    /// Replaces the trackers of an existing session wholesale. Returns
    /// `false` when no session matched `id`.
    async fn replace_by_id(&self, id: &ObjectId, trackers: String) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}
