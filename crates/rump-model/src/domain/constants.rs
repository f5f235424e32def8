//! Transfer defaults shared by the config layer and the pipeline.

/// Number of payloads the bus holds before the extractor blocks.
///
/// This is the only buffer between the source scan and the restore workers,
/// so it also bounds the memory held by in-flight values.
pub const DEFAULT_BUS_CAPACITY: usize = 100;

/// `COUNT` hint passed with every `SCAN` call.
pub const DEFAULT_SCAN_COUNT: usize = 10;
