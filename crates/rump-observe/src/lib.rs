mod logger;
pub use logger::*;

mod progress;
pub use progress::ProgressMetrics;
