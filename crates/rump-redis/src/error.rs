use redis::RedisError;
use rump_core::StoreError;

/// Classify a driver error raised while running `command`.
pub(crate) fn store_error(command: &'static str, e: RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_dropped() {
        StoreError::Connection(format!("{command}: {e}"))
    } else {
        StoreError::command(command, e)
    }
}

pub(crate) fn connect_error(endpoint: &str, e: RedisError) -> StoreError {
    StoreError::Connection(format!("{endpoint}: {e}"))
}
