mod flag;
pub use flag::Flag;

mod ttl;
pub use ttl::{KeyTtl, Ttl};

mod endpoint;
pub use endpoint::Endpoint;

mod constants;
pub use constants::{DEFAULT_BUS_CAPACITY, DEFAULT_SCAN_COUNT};
