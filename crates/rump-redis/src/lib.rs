//! Redis stores for the transfer pipeline.
//!
//! - [`RedisSource`]: `SCAN`, `DUMP` and `PTTL` over a single multiplexed connection.
//! - [`RedisTarget`]: `RESTORE ... REPLACE` over a round-robin pool, one connection per worker.
mod error;

mod pool;
pub use pool::RedisPool;

mod source;
pub use source::RedisSource;

mod target;
pub use target::RedisTarget;
