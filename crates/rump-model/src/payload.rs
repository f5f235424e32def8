use std::{borrow::Cow, fmt};

use crate::domain::Ttl;

/// Unit of transfer: one key, its store-native serialized value and its expiration.
///
/// Fields are private: a payload is built once by the extractor and only read
/// (or taken apart) by the worker that dequeues it.
#[derive(PartialEq, Eq)]
pub struct Payload {
    key: Vec<u8>,
    value: Vec<u8>,
    ttl: Ttl,
}

impl Payload {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, ttl: Ttl) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ttl,
        }
    }

    #[inline]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Key as text for logs and error messages; invalid UTF-8 is replaced.
    pub fn key_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    #[inline]
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>, Ttl) {
        (self.key, self.value, self.ttl)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("key", &self.key_lossy())
            .field("value_len", &self.value.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
