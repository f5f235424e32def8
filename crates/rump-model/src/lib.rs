mod domain;
pub use domain::{DEFAULT_BUS_CAPACITY, DEFAULT_SCAN_COUNT};
pub use domain::{Endpoint, Flag, KeyTtl, Ttl};

mod error;
pub use error::{ModelError, ModelResult};

mod payload;
pub use payload::Payload;

mod config;
pub use config::RunConfig;
