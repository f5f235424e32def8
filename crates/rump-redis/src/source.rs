use async_trait::async_trait;
use rump_core::{ScanCursor, ScanPage, SourceStore, StoreError};
use rump_model::{DEFAULT_SCAN_COUNT, KeyTtl};
use tracing::trace;

use crate::{error::store_error, pool::RedisPool};

/// Read side of a Redis transfer.
#[derive(Debug)]
pub struct RedisSource {
    pool: RedisPool,
    scan_count: usize,
}

impl RedisSource {
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }

    /// `COUNT` hint sent with every `SCAN`.
    pub fn with_scan_count(mut self, count: usize) -> Self {
        self.scan_count = count.max(1);
        self
    }
}

#[async_trait]
impl SourceStore for RedisSource {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn scan(&self, cursor: ScanCursor) -> Result<ScanPage, StoreError> {
        let mut conn = self.pool.get();
        let (next, keys): (u64, Vec<Vec<u8>>) = redis::cmd("SCAN")
            .arg(cursor.get())
            .arg("COUNT")
            .arg(self.scan_count)
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("SCAN", e))?;

        trace!(cursor = cursor.get(), next, keys = keys.len(), "SCAN");
        Ok(ScanPage {
            keys,
            next: ScanCursor::new(next),
        })
    }

    async fn dump(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.pool.get();
        redis::cmd("DUMP")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("DUMP", e))
    }

    async fn ttl(&self, key: &[u8]) -> Result<KeyTtl, StoreError> {
        let mut conn = self.pool.get();
        let reply: i64 = redis::cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("PTTL", e))?;
        decode_pttl(reply)
    }
}

/// Map a `PTTL` reply: `-1` no expiry, `-2` no such key, `n >= 0` milliseconds left.
pub(crate) fn decode_pttl(reply: i64) -> Result<KeyTtl, StoreError> {
    match reply {
        -1 => Ok(KeyTtl::Persistent),
        -2 => Ok(KeyTtl::Missing),
        ms if ms >= 0 => Ok(KeyTtl::Expires(ms as u64)),
        other => Err(StoreError::Reply {
            command: "PTTL",
            reply: other.to_string(),
        }),
    }
}
