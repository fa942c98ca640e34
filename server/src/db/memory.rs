use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use super::{models::Session, SessionStore};
use crate::error::Result;

/// Process-local store for development runs and tests. Ids are real
/// `ObjectId`s so they look the same as the MongoDB backend's.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<ObjectId, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Session>> {
        Ok(self.sessions.get(id).map(|entry| Session {
            id: Some(*entry.key()),
            trackers: entry.value().clone(),
        }))
    }

    async fn insert(&self, trackers: String) -> Result<ObjectId> {
        let id = ObjectId::new();
        self.sessions.insert(id, trackers);
        Ok(id)
    }

    async fn replace_by_id(&self, id: &ObjectId, trackers: String) -> Result<bool> {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                *entry.value_mut() = trackers;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_insert_then_find() {
        let store = InMemorySessionStore::new();
        let id = store.insert("twitter,github".to_string()).await.unwrap();

        let session = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(session.id, Some(id));
        assert_eq!(session.trackers, "twitter,github");
        assert_eq!(store.session_count(), 1);
    }

    #[actix_web::test]
    async fn test_find_unknown_id() {
        let store = InMemorySessionStore::new();
        assert!(store.find_by_id(&ObjectId::new()).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_replace_overwrites_trackers() {
        let store = InMemorySessionStore::new();
        let id = store.insert("old".to_string()).await.unwrap();

        assert!(store.replace_by_id(&id, "new".to_string()).await.unwrap());

        let session = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(session.trackers, "new");
        assert_eq!(store.session_count(), 1);
    }

    #[actix_web::test]
    async fn test_replace_unknown_id_does_not_insert() {
        let store = InMemorySessionStore::new();
        let matched = store
            .replace_by_id(&ObjectId::new(), "x".to_string())
            .await
            .unwrap();

        assert!(!matched);
        assert_eq!(store.session_count(), 0);
    }

    #[actix_web::test]
    async fn test_clones_share_sessions() {
        let store = InMemorySessionStore::new();
        let clone = store.clone();
        let id = clone.insert("shared".to_string()).await.unwrap();
        assert!(store.find_by_id(&id).await.unwrap().is_some());
    }
}
