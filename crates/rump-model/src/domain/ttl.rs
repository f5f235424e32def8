use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Expiration carried by a payload, in milliseconds.
///
/// `0` is reserved for "no expiration" and matches the `RESTORE` convention.
/// A key that is about to expire is never encoded as `0`: see [`Ttl::from_remaining_ms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ttl(u64);

impl Ttl {
    /// Sentinel for keys without expiration.
    pub const NONE: Ttl = Ttl(0);

    /// Build a TTL from a remaining lifetime reported by the store.
    ///
    /// A remaining lifetime of `0` is clamped to `1`, otherwise it would read as the sentinel
    /// and the key would be restored as persistent.
    pub const fn from_remaining_ms(ms: u64) -> Self {
        if ms == 0 { Ttl(1) } else { Ttl(ms) }
    }

    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_persistent(&self) -> bool {
        self.0 == 0
    }

    /// Remaining lifetime, `None` for persistent keys.
    pub fn as_duration(&self) -> Option<Duration> {
        if self.is_persistent() {
            None
        } else {
            Some(Duration::from_millis(self.0))
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_persistent() {
            f.write_str("persistent")
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

/// Answer of a source-side TTL lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key exists and has no expiration.
    Persistent,
    /// The key exists and expires after the given number of milliseconds.
    Expires(u64),
    /// The key no longer exists (expired or deleted after it was scanned).
    Missing,
}

impl KeyTtl {
    /// Normalize into the payload representation.
    ///
    /// `Missing` has no payload TTL: the caller decides what to do with a vanished key.
    pub fn normalize(self) -> Option<Ttl> {
        match self {
            KeyTtl::Persistent => Some(Ttl::NONE),
            KeyTtl::Expires(ms) => Some(Ttl::from_remaining_ms(ms)),
            KeyTtl::Missing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistent_normalizes_to_sentinel() {
        assert_eq!(KeyTtl::Persistent.normalize(), Some(Ttl::NONE));
        assert!(Ttl::NONE.is_persistent());
        assert_eq!(Ttl::NONE.as_duration(), None);
    }

    #[test]
    fn expiring_keys_keep_their_lifetime() {
        let ttl = KeyTtl::Expires(5_000).normalize().unwrap();
        assert_eq!(ttl.as_millis(), 5_000);
        assert_eq!(ttl.as_duration(), Some(Duration::from_millis(5_000)));
    }

    #[test]
    fn zero_remaining_is_not_the_sentinel() {
        let ttl = KeyTtl::Expires(0).normalize().unwrap();
        assert!(!ttl.is_persistent());
        assert_eq!(ttl.as_millis(), 1);
    }

    #[test]
    fn missing_key_has_no_ttl() {
        assert_eq!(KeyTtl::Missing.normalize(), None);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Ttl::NONE.to_string(), "persistent");
        assert_eq!(Ttl::from_remaining_ms(250).to_string(), "250ms");
    }
}
