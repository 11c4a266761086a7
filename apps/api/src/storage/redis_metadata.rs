//! Redis-backed metadata index.
//!
//! Layout under one named collection:
//! - `<collection>:index`: list of ids in insertion order
//! - `<collection>:record:<id>`: the JSON-encoded `ResumeMetadata`
//!
//! Writes touch both keys in one MULTI/EXEC pipeline, so the index and the records
//! never disagree.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{info, warn};

use crate::storage::{MetadataStore, ResumeId, ResumeMetadata, StoreError};

#[derive(Clone)]
pub struct RedisMetadataStore {
    connection: MultiplexedConnection,
    collection: String,
}

impl RedisMetadataStore {
    pub async fn connect(client: &redis::Client, collection: &str) -> Result<Self, StoreError> {
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::failure("metadata.connect", e))?;
        info!("Redis metadata index ready (collection: {collection})");
        Ok(Self {
            connection,
            collection: collection.to_string(),
        })
    }

    fn index_key(&self) -> String {
        index_key(&self.collection)
    }

    fn record_key(&self, id: &ResumeId) -> String {
        record_key(&self.collection, id)
    }
}

fn index_key(collection: &str) -> String {
    format!("{collection}:index")
}

fn record_key(collection: &str, id: &ResumeId) -> String {
    format!("{collection}:record:{id}")
}

fn decode(operation: &'static str, raw: &str) -> Result<ResumeMetadata, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::failure(operation, e))
}

#[async_trait]
impl MetadataStore for RedisMetadataStore {
    async fn put(&self, record: &ResumeMetadata) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(record).map_err(|e| StoreError::failure("metadata.put", e))?;
        let mut conn = self.connection.clone();

        redis::pipe()
            .atomic()
            .set(self.record_key(&record.id), json)
            .ignore()
            .rpush(self.index_key(), record.id.as_str())
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| StoreError::failure("metadata.put", e))
    }

    async fn list(&self) -> Result<Vec<ResumeMetadata>, StoreError> {
        let mut conn = self.connection.clone();
        let ids: Vec<String> = conn
            .lrange(self.index_key(), 0, -1)
            .await
            .map_err(|e| StoreError::failure("metadata.list", e))?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids
            .iter()
            .map(|id| format!("{}:record:{id}", self.collection))
            .collect();
        let raw: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::failure("metadata.list", e))?;

        let mut records = Vec::with_capacity(raw.len());
        for (id, entry) in ids.iter().zip(raw) {
            match entry {
                Some(json) => records.push(decode("metadata.list", &json)?),
                None => warn!("Index entry {id} has no metadata record, skipping"),
            }
        }
        Ok(records)
    }

    async fn get(&self, id: &ResumeId) -> Result<Option<ResumeMetadata>, StoreError> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn
            .get(self.record_key(id))
            .await
            .map_err(|e| StoreError::failure("metadata.get", e))?;
        raw.map(|json| decode("metadata.get", &json)).transpose()
    }

    async fn delete(&self, id: &ResumeId) -> Result<bool, StoreError> {
        let mut conn = self.connection.clone();
        let (deleted, unindexed): (i64, i64) = redis::pipe()
            .atomic()
            .del(self.record_key(id))
            .lrem(self.index_key(), 0, id.as_str())
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::failure("metadata.delete", e))?;
        Ok(deleted > 0 || unindexed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let id = ResumeId::parse("resume_1_abc").unwrap();
        assert_eq!(index_key("resumes"), "resumes:index");
        assert_eq!(record_key("resumes", &id), "resumes:record:resume_1_abc");
    }

    #[test]
    fn test_decode_error_names_operation() {
        let err = decode("metadata.get", "not json").unwrap_err();
        assert!(err.to_string().contains("metadata.get"));
    }
}
