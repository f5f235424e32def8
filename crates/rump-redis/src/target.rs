use async_trait::async_trait;
use rump_core::{StoreError, TargetStore};
use rump_model::Ttl;

use crate::{error::store_error, pool::RedisPool};

/// Write side of a Redis transfer.
///
/// Size the pool to the worker count so every worker has a connection of its own.
#[derive(Debug)]
pub struct RedisTarget {
    pool: RedisPool,
}

impl RedisTarget {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TargetStore for RedisTarget {
    fn name(&self) -> &'static str {
        "redis"
    }

    /// `RESTORE key ttl value REPLACE`; a zero `ttl` restores without expiry.
    async fn restore(&self, key: &[u8], ttl: Ttl, value: &[u8]) -> Result<(), StoreError> {
        let mut conn = self.pool.get();
        let _: () = redis::cmd("RESTORE")
            .arg(key)
            .arg(ttl.as_millis())
            .arg(value)
            .arg("REPLACE")
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("RESTORE", e))?;
        Ok(())
    }
}
