use std::fmt;

/// Identity of a task inside one transfer run.
///
/// Used as the `task` field in logs and as the metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskRole {
    /// Adapter that turns the external interrupt into cancellation.
    Interrupt,
    /// The single source scanner.
    Extractor,
    /// Restore worker with its index in the pool.
    Worker(usize),
}

impl TaskRole {
    /// `true` for tasks that move data (extractor and workers).
    ///
    /// The run is complete once all of them have returned.
    #[inline]
    pub fn is_transfer(&self) -> bool {
        !matches!(self, TaskRole::Interrupt)
    }
}

impl fmt::Display for TaskRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRole::Interrupt => f.write_str("interrupt"),
            TaskRole::Extractor => f.write_str("extractor"),
            TaskRole::Worker(i) => write!(f, "worker-{i}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TaskRole;

    #[test]
    fn display_names() {
        assert_eq!(TaskRole::Interrupt.to_string(), "interrupt");
        assert_eq!(TaskRole::Extractor.to_string(), "extractor");
        assert_eq!(TaskRole::Worker(3).to_string(), "worker-3");
    }

    #[test]
    fn interrupt_is_not_a_transfer_task() {
        assert!(!TaskRole::Interrupt.is_transfer());
        assert!(TaskRole::Extractor.is_transfer());
        assert!(TaskRole::Worker(0).is_transfer());
    }
}
