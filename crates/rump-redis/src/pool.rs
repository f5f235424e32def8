use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use redis::aio::ConnectionManager;
use rump_core::StoreError;
use rump_model::Endpoint;
use tracing::{debug, info};

use crate::error::connect_error;

/// Fixed set of multiplexed connections to one Redis instance.
///
/// [`RedisPool::get`] hands them out round-robin; each connection reconnects on
/// its own after a drop.
pub struct RedisPool {
    endpoint: Endpoint,
    conns: Vec<ConnectionManager>,
    next: AtomicUsize,
}

impl fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisPool")
            .field("endpoint", &self.endpoint.redacted())
            .field("size", &self.conns.len())
            .finish()
    }
}

impl RedisPool {
    /// Open `size` connections (at least one) to `endpoint`.
    pub async fn connect(endpoint: &Endpoint, size: usize) -> Result<Self, StoreError> {
        let size = size.max(1);
        info!(endpoint = %endpoint, size, "connecting to redis");

        let client = redis::Client::open(endpoint.as_str())
            .map_err(|e| connect_error(&endpoint.redacted(), e))?;

        let mut conns = Vec::with_capacity(size);
        for i in 0..size {
            let conn = ConnectionManager::new(client.clone())
                .await
                .map_err(|e| connect_error(&endpoint.redacted(), e))?;
            debug!(endpoint = %endpoint, slot = i, "connection ready");
            conns.push(conn);
        }

        Ok(Self {
            endpoint: endpoint.clone(),
            conns,
            next: AtomicUsize::new(0),
        })
    }

    /// Next connection in round-robin order.
    pub fn get(&self) -> ConnectionManager {
        let slot = self.next.fetch_add(1, Ordering::Relaxed) % self.conns.len();
        self.conns[slot].clone()
    }
}
