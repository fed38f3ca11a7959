use super::{RECORD_SIZE, error::ParseResult, error::WireError};
use crate::{ErrorCode, SensorId};

// record layout : sensor_id(1) + timestamp(4) + temperature(4) + humidity(4)
//                 + error_flag(1) + error_type(1)
//
// This must match the receiving firmware's packed struct byte for byte.

/// A single fixed-size sensor reading.
///
/// Immutable once created. Numeric values are not validated on encode; the
/// 32-bit timestamp wraps modulo 2^32 and floats are written bit-exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub sensor_id: SensorId,
    /// Unix timestamp in seconds.
    pub timestamp: u32,
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Whether this reading indicates an error.
    pub error_flag: bool,
    pub error_type: ErrorCode,
}

impl SensorReading {
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];

        bytes[0] = self.sensor_id.0;
        bytes[1..5].copy_from_slice(&self.timestamp.to_le_bytes());
        bytes[5..9].copy_from_slice(&self.temperature.to_le_bytes());
        bytes[9..13].copy_from_slice(&self.humidity.to_le_bytes());
        bytes[13] = self.error_flag as u8;
        bytes[14] = self.error_type as u8;

        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> ParseResult<Self> {
        if bytes.len() < RECORD_SIZE {
            return Err(WireError::InsufficientData {
                needed: RECORD_SIZE,
                available: bytes.len(),
            });
        }

        let error_flag = match bytes[13] {
            0 => false,
            1 => true,
            other => return Err(WireError::InvalidErrorFlag(other)),
        };

        Ok(Self {
            sensor_id: SensorId(bytes[0]),
            timestamp: u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]),
            temperature: f32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]),
            humidity: f32::from_le_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]),
            error_flag,
            error_type: ErrorCode::try_from(bytes[14])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_record_bytes() {
        let reading = SensorReading {
            sensor_id: SensorId(7),
            timestamp: 0x0102_0304,
            temperature: 21.5,
            humidity: 48.25,
            error_flag: true,
            error_type: ErrorCode::TooHigh,
        };

        // 21.5f32 = 0x41AC0000, 48.25f32 = 0x42410000
        let expected: [u8; RECORD_SIZE] = [
            7, // sensor_id
            0x04, 0x03, 0x02, 0x01, // timestamp LE
            0x00, 0x00, 0xAC, 0x41, // temperature LE
            0x00, 0x00, 0x41, 0x42, // humidity LE
            1, // error_flag
            2, // error_type
        ];

        assert_eq!(reading.to_bytes(), expected);
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let reading = SensorReading {
            sensor_id: SensorId(255),
            timestamp: u32::MAX,
            temperature: -40.75,
            humidity: 100.0,
            error_flag: false,
            error_type: ErrorCode::None,
        };

        let decoded = SensorReading::from_bytes(&reading.to_bytes()).unwrap();

        assert_eq!(decoded.sensor_id, reading.sensor_id);
        assert_eq!(decoded.timestamp, reading.timestamp);
        // floats must round-trip bit-exact, not just approximately
        assert_eq!(decoded.temperature.to_bits(), reading.temperature.to_bits());
        assert_eq!(decoded.humidity.to_bits(), reading.humidity.to_bits());
        assert_eq!(decoded.error_flag, reading.error_flag);
        assert_eq!(decoded.error_type, reading.error_type);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let err = SensorReading::from_bytes(&[0u8; RECORD_SIZE - 1]).unwrap_err();
        assert_eq!(
            err,
            WireError::InsufficientData {
                needed: RECORD_SIZE,
                available: RECORD_SIZE - 1,
            }
        );
    }

    #[test]
    fn invalid_flag_and_code_are_rejected() {
        let mut bytes = SensorReading {
            sensor_id: SensorId(1),
            timestamp: 0,
            temperature: 0.0,
            humidity: 0.0,
            error_flag: false,
            error_type: ErrorCode::None,
        }
        .to_bytes();

        bytes[13] = 2;
        assert_eq!(
            SensorReading::from_bytes(&bytes).unwrap_err(),
            WireError::InvalidErrorFlag(2)
        );

        bytes[13] = 1;
        bytes[14] = 3;
        assert_eq!(
            SensorReading::from_bytes(&bytes).unwrap_err(),
            WireError::InvalidErrorCode(3)
        );
    }
}
