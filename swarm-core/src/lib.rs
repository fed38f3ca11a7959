use serde::{Deserialize, Serialize};

pub mod wire;

pub use wire::{Batch, SensorReading};

/// Identifier of a simulated sensor unit.
///
/// The wire format reserves a single byte for the id, so the whole fleet
/// shares the 0-255 id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId(pub u8);

/// Error classification carried in a reading's `error_type` byte.
///
/// Values match the receiving firmware's threshold checker codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    None = 0,
    TooLow = 1,
    TooHigh = 2,
    SensorFail = 4,
}

impl TryFrom<u8> for ErrorCode {
    type Error = wire::WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::None),
            1 => Ok(ErrorCode::TooLow),
            2 => Ok(ErrorCode::TooHigh),
            4 => Ok(ErrorCode::SensorFail),
            _ => Err(wire::WireError::InvalidErrorCode(value)),
        }
    }
}
