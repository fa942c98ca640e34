use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection, Database,
};

use super::{models::Session, SessionStore};
use crate::config::StoreConfig;
use crate::error::{Result, SessionsError};

/// MongoDB-backed store. Cloning shares the driver's connection pool.
#[derive(Clone)]
pub struct MongoSessionStore {
    db: Database,
    collection: Collection<Session>,
}

impl MongoSessionStore {
    pub fn new(client: Client, database_name: &str, collection_name: &str) -> Self {
        let db = client.database(database_name);
        let collection = db.collection(collection_name);
        Self { db, collection }
    }

    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let uri = config.connection_uri()?;
        log::info!(
            "Connecting to MongoDB (database: {}, collection: {})...",
            config.database,
            config.collection
        );
        let client = Client::with_uri_str(&uri).await?;
        Ok(Self::new(client, &config.database, &config.collection))
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Session>> {
        let session = self.collection.find_one(doc! { "_id": *id }).await?;
        Ok(session)
    }

    async fn insert(&self, trackers: String) -> Result<ObjectId> {
        let result = self.collection.insert_one(Session::new(trackers)).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| SessionsError::Internal("Inserted ID is not an ObjectId".to_string()))
    }

    async fn replace_by_id(&self, id: &ObjectId, trackers: String) -> Result<bool> {
        let result = self
            .collection
            .replace_one(doc! { "_id": *id }, Session::new(trackers))
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
