//! Redis-backed document collections.
//!
//! Each collection is one hash at `{namespace}:{collection}`; its key
//! sequence lives at `{namespace}:seq:{collection}`. Connections come from a
//! `bb8` pool over a multiplexed connection manager.

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{self, RedisError};

use super::collections::{Collection, DocumentCollections, DocumentStoreError};

/// Default key prefix for the collections.
pub const DEFAULT_NAMESPACE: &str = "registrar";

/// Collections stored as Redis hashes.
#[derive(Clone)]
pub struct RedisCollections {
    pool: Pool<RedisConnectionManager>,
    namespace: String,
}

impl RedisCollections {
    /// Connect to `redis_url` and keep collections under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Connection`] when the URL is invalid or
    /// the pool cannot open its first connection.
    pub async fn connect(
        redis_url: &str,
        namespace: impl Into<String>,
    ) -> Result<Self, DocumentStoreError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| DocumentStoreError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| DocumentStoreError::connection(err.to_string()))?;
        Ok(Self {
            pool,
            namespace: namespace.into(),
        })
    }

    fn hash_key(&self, collection: Collection) -> String {
        collection_key(&self.namespace, collection)
    }

    fn sequence_key(&self, collection: Collection) -> String {
        sequence_key(&self.namespace, collection)
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, DocumentStoreError> {
        self.pool.get().await.map_err(map_pool_error)
    }
}

fn collection_key(namespace: &str, collection: Collection) -> String {
    format!("{namespace}:{}", collection.as_str())
}

fn sequence_key(namespace: &str, collection: Collection) -> String {
    format!("{namespace}:seq:{}", collection.as_str())
}

fn map_pool_error(error: RunError<RedisError>) -> DocumentStoreError {
    match error {
        RunError::User(err) => map_redis_error(&err),
        RunError::TimedOut => DocumentStoreError::connection("timed out waiting for connection"),
    }
}

fn map_redis_error(error: &RedisError) -> DocumentStoreError {
    if error.is_io_error() || error.is_connection_dropped() || error.is_connection_refusal() {
        DocumentStoreError::connection(error.to_string())
    } else {
        DocumentStoreError::backend(error.to_string())
    }
}

#[async_trait]
impl DocumentCollections for RedisCollections {
    async fn get(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<String>, DocumentStoreError> {
        let mut conn = self.connection().await?;
        redis::cmd("HGET")
            .arg(self.hash_key(collection))
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        value: String,
    ) -> Result<(), DocumentStoreError> {
        let mut conn = self.connection().await?;
        let _: i64 = redis::cmd("HSET")
            .arg(self.hash_key(collection))
            .arg(key)
            .arg(value)
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))?;
        Ok(())
    }

    async fn insert_new(
        &self,
        collection: Collection,
        key: &str,
        value: String,
    ) -> Result<bool, DocumentStoreError> {
        let mut conn = self.connection().await?;
        redis::cmd("HSETNX")
            .arg(self.hash_key(collection))
            .arg(key)
            .arg(value)
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))
    }

    async fn delete(&self, collection: Collection, key: &str) -> Result<bool, DocumentStoreError> {
        let mut conn = self.connection().await?;
        let removed: i64 = redis::cmd("HDEL")
            .arg(self.hash_key(collection))
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))?;
        Ok(removed > 0)
    }

    async fn list(&self, collection: Collection) -> Result<Vec<String>, DocumentStoreError> {
        let mut conn = self.connection().await?;
        redis::cmd("HVALS")
            .arg(self.hash_key(collection))
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))
    }

    async fn clear(&self, collection: Collection) -> Result<(), DocumentStoreError> {
        let mut conn = self.connection().await?;
        let _: i64 = redis::cmd("DEL")
            .arg(self.hash_key(collection))
            .arg(self.sequence_key(collection))
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))?;
        Ok(())
    }

    async fn next_sequence(&self, collection: Collection) -> Result<i64, DocumentStoreError> {
        let mut conn = self.connection().await?;
        redis::cmd("INCR")
            .arg(self.sequence_key(collection))
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))
    }

    async fn set_sequence(
        &self,
        collection: Collection,
        value: i64,
    ) -> Result<(), DocumentStoreError> {
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("SET")
            .arg(self.sequence_key(collection))
            .arg(value)
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Collection::Users, "registrar:users")]
    #[case(Collection::EnrollmentPairs, "registrar:enrollment_pairs")]
    fn collection_keys_are_namespaced(#[case] collection: Collection, #[case] expected: &str) {
        assert_eq!(collection_key(DEFAULT_NAMESPACE, collection), expected);
    }

    #[rstest]
    fn sequence_keys_do_not_collide_with_hashes() {
        let hash = collection_key("uni", Collection::Enrollments);
        let sequence = sequence_key("uni", Collection::Enrollments);
        assert_eq!(sequence, "uni:seq:enrollments");
        assert_ne!(hash, sequence);
    }

    #[rstest]
    fn pool_timeouts_are_connection_errors() {
        let err = map_pool_error(RunError::TimedOut);
        assert!(matches!(err, DocumentStoreError::Connection { .. }));
    }

    #[rstest]
    fn command_errors_are_backend_errors() {
        let err = map_redis_error(&RedisError::from((
            redis::ErrorKind::UnexpectedReturnType,
            "WRONGTYPE",
        )));
        assert!(matches!(err, DocumentStoreError::Backend { .. }));
    }
}
