//! In-memory store used to exercise the pipeline without a server.
//!
//! Values are "serialized" by prefixing them with a version tag, so a restore
//! of bytes that did not come from [`MemoryStore::dump`] fails the same way a
//! corrupted `DUMP` payload would. Faults (failing or stalling operations)
//! can be injected per key.
use std::{
    collections::{BTreeMap, HashSet},
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use rump_model::{KeyTtl, Ttl};

use crate::store::{ScanCursor, ScanPage, SourceStore, StoreError, TargetStore};

const DUMP_TAG: &[u8] = b"MEM\x01";

/// Default number of keys returned per scan page.
pub const MEMORY_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Default)]
struct Faults {
    dump: HashSet<Vec<u8>>,
    ttl: HashSet<Vec<u8>>,
    restore: HashSet<Vec<u8>>,
    stall_scan: bool,
    stall_ttl: bool,
    stall_restores: bool,
}

/// Thread-safe in-memory keyspace implementing both store sides.
#[derive(Debug)]
pub struct MemoryStore {
    name: &'static str,
    page_size: usize,
    entries: Mutex<BTreeMap<Vec<u8>, Entry>>,
    faults: Mutex<Faults>,
    ttl_queries: AtomicU64,
    restores: AtomicU64,
}

impl MemoryStore {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            page_size: MEMORY_PAGE_SIZE,
            entries: Mutex::new(BTreeMap::new()),
            faults: Mutex::new(Faults::default()),
            ttl_queries: AtomicU64::new(0),
            restores: AtomicU64::new(0),
        }
    }

    /// Change the number of keys returned per scan page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Store a persistent key.
    pub fn insert(&self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.put(key.into(), value.into(), None);
    }

    /// Store a key expiring after `ttl`.
    pub fn insert_with_ttl(
        &self,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        ttl: Duration,
    ) {
        self.put(key.into(), value.into(), Some(Instant::now() + ttl));
    }

    /// Raw (unserialized) value of a live key.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let now = Instant::now();
        self.entries()
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone())
    }

    /// Remaining lifetime of a key, computed the way `PTTL` reports it.
    pub fn ttl_of(&self, key: &[u8]) -> KeyTtl {
        let now = Instant::now();
        match self.entries().get(key) {
            Some(e) if e.is_live(now) => match e.expires_at {
                None => KeyTtl::Persistent,
                Some(at) => KeyTtl::Expires(at.duration_since(now).as_millis() as u64),
            },
            _ => KeyTtl::Missing,
        }
    }

    /// Live keys in lexical order.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        let now = Instant::now();
        self.entries()
            .iter()
            .filter(|(_, e)| e.is_live(now))
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of TTL lookups served so far.
    pub fn ttl_queries(&self) -> u64 {
        self.ttl_queries.load(Ordering::Relaxed)
    }

    /// Number of successful restores served so far.
    pub fn restores(&self) -> u64 {
        self.restores.load(Ordering::Relaxed)
    }

    /// Make `dump` fail for `key`.
    pub fn fail_dump_on(&self, key: impl Into<Vec<u8>>) {
        self.faults().dump.insert(key.into());
    }

    /// Make `ttl` fail for `key`.
    pub fn fail_ttl_on(&self, key: impl Into<Vec<u8>>) {
        self.faults().ttl.insert(key.into());
    }

    /// Make `restore` fail for `key`.
    pub fn fail_restore_on(&self, key: impl Into<Vec<u8>>) {
        self.faults().restore.insert(key.into());
    }

    /// Make every `scan` block forever.
    pub fn stall_scan(&self) {
        self.faults().stall_scan = true;
    }

    /// Make every `ttl` lookup block forever.
    pub fn stall_ttl(&self) {
        self.faults().stall_ttl = true;
    }

    /// Make every `restore` block forever (until the caller gives up on it).
    pub fn stall_restores(&self) {
        self.faults().stall_restores = true;
    }

    /// Serialize a raw value the way [`MemoryStore::dump`] does.
    pub fn serialize(value: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(DUMP_TAG.len() + value.len());
        out.extend_from_slice(DUMP_TAG);
        out.extend_from_slice(value);
        out
    }

    fn put(&self, key: Vec<u8>, value: Vec<u8>, expires_at: Option<Instant>) {
        self.entries().insert(key, Entry { value, expires_at });
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<Vec<u8>, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SourceStore for MemoryStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn scan(&self, cursor: ScanCursor) -> Result<ScanPage, StoreError> {
        let stall = self.faults().stall_scan;
        if stall {
            std::future::pending::<()>().await;
        }
        let keys = self.keys();
        let start = cursor.get() as usize;
        if start > keys.len() {
            return Err(StoreError::Reply {
                command: "SCAN",
                reply: format!("cursor {start} out of range"),
            });
        }
        let end = (start + self.page_size).min(keys.len());
        let next = if end >= keys.len() {
            ScanCursor::START
        } else {
            ScanCursor::new(end as u64)
        };
        Ok(ScanPage {
            keys: keys[start..end].to_vec(),
            next,
        })
    }

    async fn dump(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if self.faults().dump.contains(key) {
            return Err(StoreError::command("DUMP", "injected failure"));
        }
        Ok(self.get(key).map(|v| Self::serialize(&v)))
    }

    async fn ttl(&self, key: &[u8]) -> Result<KeyTtl, StoreError> {
        self.ttl_queries.fetch_add(1, Ordering::Relaxed);
        let (stall, fail) = {
            let faults = self.faults();
            (faults.stall_ttl, faults.ttl.contains(key))
        };
        if stall {
            std::future::pending::<()>().await;
        }
        if fail {
            return Err(StoreError::command("PTTL", "injected failure"));
        }
        Ok(self.ttl_of(key))
    }
}

#[async_trait]
impl TargetStore for MemoryStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn restore(&self, key: &[u8], ttl: Ttl, value: &[u8]) -> Result<(), StoreError> {
        let (stall, fail) = {
            let faults = self.faults();
            (faults.stall_restores, faults.restore.contains(key))
        };
        if stall {
            std::future::pending::<()>().await;
        }
        if fail {
            return Err(StoreError::command("RESTORE", "injected failure"));
        }
        let Some(raw) = value.strip_prefix(DUMP_TAG) else {
            return Err(StoreError::command(
                "RESTORE",
                "DUMP payload version or checksum are wrong",
            ));
        };
        let expires_at = ttl.as_duration().map(|d| Instant::now() + d);
        self.put(key.to_vec(), raw.to_vec(), expires_at);
        self.restores.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scan_pages_through_every_key() {
        let store = MemoryStore::new("mem").with_page_size(2);
        for k in ["a", "b", "c", "d", "e"] {
            store.insert(k, "v");
        }

        let mut cursor = ScanCursor::START;
        let mut seen = Vec::new();
        loop {
            let page = store.scan(cursor).await.unwrap();
            assert!(page.keys.len() <= 2);
            seen.extend(page.keys.iter().cloned());
            if page.is_last() {
                break;
            }
            cursor = page.next;
        }
        assert_eq!(seen.len(), 5);
    }

    #[tokio::test]
    async fn dump_then_restore_is_verbatim() {
        let src = MemoryStore::new("src");
        let dst = MemoryStore::new("dst");
        src.insert("bin", vec![0u8, 1, 2, 255]);

        let dumped = src.dump(b"bin").await.unwrap().unwrap();
        dst.restore(b"bin", Ttl::NONE, &dumped).await.unwrap();

        assert_eq!(dst.get(b"bin"), Some(vec![0u8, 1, 2, 255]));
        assert_eq!(dst.ttl_of(b"bin"), KeyTtl::Persistent);
    }

    #[tokio::test]
    async fn restore_rejects_foreign_payload() {
        let dst = MemoryStore::new("dst");
        let err = dst.restore(b"k", Ttl::NONE, b"raw").await.unwrap_err();
        assert!(matches!(err, StoreError::Command { command: "RESTORE", .. }));
    }

    #[tokio::test]
    async fn restore_overwrites_existing_value() {
        let dst = MemoryStore::new("dst");
        dst.insert_with_ttl("k", "old", Duration::from_secs(60));

        dst.restore(b"k", Ttl::NONE, &MemoryStore::serialize(b"new"))
            .await
            .unwrap();

        assert_eq!(dst.get(b"k"), Some(b"new".to_vec()));
        assert_eq!(dst.ttl_of(b"k"), KeyTtl::Persistent);
    }

    #[tokio::test]
    async fn ttl_reports_expiring_and_missing_keys() {
        let store = MemoryStore::new("mem");
        store.insert_with_ttl("k", "v", Duration::from_secs(5));

        match store.ttl(b"k").await.unwrap() {
            KeyTtl::Expires(ms) => assert!(ms > 4_000 && ms <= 5_000, "got {ms}"),
            other => panic!("expected Expires, got {other:?}"),
        }
        assert_eq!(store.ttl(b"gone").await.unwrap(), KeyTtl::Missing);
        assert_eq!(store.ttl_queries(), 2);
    }

    #[tokio::test]
    async fn dump_of_missing_key_is_none() {
        let store = MemoryStore::new("mem");
        assert!(store.dump(b"nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_faults_surface_as_command_errors() {
        let store = MemoryStore::new("mem");
        store.insert("k", "v");
        store.fail_dump_on("k");
        store.fail_ttl_on("k");

        assert!(store.dump(b"k").await.is_err());
        assert!(store.ttl(b"k").await.is_err());
    }
}
