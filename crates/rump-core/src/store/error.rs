use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("{command} failed: {reason}")]
    Command {
        command: &'static str,
        reason: String,
    },

    #[error("unexpected reply to {command}: {reply}")]
    Reply {
        command: &'static str,
        reply: String,
    },
}

impl StoreError {
    pub fn command(command: &'static str, reason: impl ToString) -> Self {
        StoreError::Command {
            command,
            reason: reason.to_string(),
        }
    }
}
