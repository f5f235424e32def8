use serde::{Deserialize, Serialize};

/// On/off switch for optional transfer behavior (`silent`, `sync_ttl`).
///
/// Disabled by default: every optional behavior is opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(bool);

impl Flag {
    pub const fn enabled() -> Self {
        Self(true)
    }

    pub const fn disabled() -> Self {
        Self(false)
    }

    pub const fn is_enabled(&self) -> bool {
        self.0
    }

    pub const fn is_disabled(&self) -> bool {
        !self.0
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

impl From<Flag> for bool {
    fn from(f: Flag) -> Self {
        f.0
    }
}

#[cfg(test)]
mod tests {
    use super::Flag;

    #[test]
    fn default_is_disabled() {
        assert!(Flag::default().is_disabled());
    }

    #[test]
    fn converts_from_cli_bool() {
        let on: Flag = true.into();
        let off: Flag = false.into();

        assert!(on.is_enabled());
        assert!(off.is_disabled());
        assert!(bool::from(on));
    }

    #[test]
    fn serializes_as_plain_bool() {
        let json = serde_json::to_string(&Flag::enabled()).unwrap();
        assert_eq!(json, "true");

        let back: Flag = serde_json::from_str("false").unwrap();
        assert!(back.is_disabled());
    }
}
