mod batch;
mod error;
mod record;

pub use batch::Batch;
pub use error::{ParseResult, WireError};
pub use record::SensorReading;

// batch structure : send_millis header(4) + record(15) * N, little-endian throughout

/// Encoded size of one reading. The layout is packed, no padding bytes.
pub const RECORD_SIZE: usize = 15;

/// Size of the 32-bit send-timestamp header prefixed to every batch.
pub const BATCH_HEADER_SIZE: usize = 4;
