use super::{BATCH_HEADER_SIZE, RECORD_SIZE, error::ParseResult, error::WireError};
use super::record::SensorReading;

/// An ordered group of readings sent in one transport call.
///
/// Created fresh for every send attempt and discarded after transmission
/// regardless of outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Milliseconds since epoch at send time, wrapped to 32 bits.
    pub send_millis: u32,
    pub readings: Vec<SensorReading>,
}

impl Batch {
    pub fn new(send_millis: u32, readings: Vec<SensorReading>) -> Self {
        Self {
            send_millis,
            readings,
        }
    }

    /// Total encoded length: header plus one fixed-size record per reading.
    pub fn encoded_len(&self) -> usize {
        BATCH_HEADER_SIZE + self.readings.len() * RECORD_SIZE
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());

        bytes.extend_from_slice(&self.send_millis.to_le_bytes());
        for reading in &self.readings {
            bytes.extend_from_slice(&reading.to_bytes());
        }

        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> ParseResult<Self> {
        if bytes.len() < BATCH_HEADER_SIZE {
            return Err(WireError::InsufficientData {
                needed: BATCH_HEADER_SIZE,
                available: bytes.len(),
            });
        }

        let send_millis = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

        let payload = &bytes[BATCH_HEADER_SIZE..];
        let extra = payload.len() % RECORD_SIZE;
        if extra != 0 {
            return Err(WireError::PartialRecord { extra });
        }

        let readings = payload
            .chunks_exact(RECORD_SIZE)
            .map(SensorReading::from_bytes)
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(Self {
            send_millis,
            readings,
        })
    }
}
