//! Store abstraction consumed by the transfer pipeline.
//!
//! The pipeline only needs four operations, split by side:
//! - source: cursor scan, serialized dump, remaining TTL;
//! - target: restore with overwrite.
//!
//! Concrete stores (Redis, in-memory) implement these traits and are shared
//! between tasks behind an `Arc`.
mod error;
pub use error::StoreError;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

use async_trait::async_trait;
use rump_model::{KeyTtl, Ttl};

/// Position in a cursor-based keyspace scan.
///
/// The scan starts at [`ScanCursor::START`] and is complete once the store
/// hands back `START` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanCursor(u64);

impl ScanCursor {
    pub const START: ScanCursor = ScanCursor(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_start(&self) -> bool {
        self.0 == 0
    }
}

/// One page of a keyspace scan.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub keys: Vec<Vec<u8>>,
    pub next: ScanCursor,
}

impl ScanPage {
    /// `true` when this is the last page of the scan.
    #[inline]
    pub fn is_last(&self) -> bool {
        self.next.is_start()
    }
}

/// Read side of a transfer.
///
/// Implementations must be safe to call from several tasks at once: the
/// extractor scans and dumps while workers query TTLs.
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Store name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the next page of keys, starting at `cursor`.
    ///
    /// A page may be empty while the returned cursor is not the start one.
    /// Keys may be returned more than once across pages.
    async fn scan(&self, cursor: ScanCursor) -> Result<ScanPage, StoreError>;

    /// Store-native serialized value of `key`, `None` if the key is gone.
    async fn dump(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remaining lifetime of `key`.
    async fn ttl(&self, key: &[u8]) -> Result<KeyTtl, StoreError>;
}

/// Write side of a transfer.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Store name used in logs.
    fn name(&self) -> &'static str;

    /// Restore a serialized value, replacing whatever is stored at `key`.
    ///
    /// `ttl` of [`Ttl::NONE`] restores the key without expiration.
    async fn restore(&self, key: &[u8], ttl: Ttl, value: &[u8]) -> Result<(), StoreError>;
}
