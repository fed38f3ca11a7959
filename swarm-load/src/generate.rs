use rand::Rng;
use swarm_core::{Batch, ErrorCode, SensorId, SensorReading};

use crate::config::GenerateConfig;

/// A simulated sensor unit with a stable identity.
///
/// Each send cycle produces a fresh batch of randomized readings within the
/// configured plausible ranges.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    id: SensorId,
    ranges: GenerateConfig,
}

impl SimulatedSensor {
    pub fn new(id: SensorId, ranges: GenerateConfig) -> Self {
        Self { id, ranges }
    }

    /// Build one simulated sensor per configured identity.
    pub fn fleet(ids: &[SensorId], ranges: GenerateConfig) -> Vec<Self> {
        ids.iter().map(|&id| Self::new(id, ranges)).collect()
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    /// Generate a batch of `size` readings stamped `base_ts + i` seconds,
    /// headed by the current send time in wrapped epoch milliseconds.
    pub fn next_batch(&self, size: usize) -> Batch {
        let base_ts = jiff::Timestamp::now().as_second() as u32;
        let mut rng = rand::rng();

        let readings = (0..size)
            .map(|i| self.generate_reading(&mut rng, base_ts.wrapping_add(i as u32)))
            .collect();

        Batch::new(send_millis_now(), readings)
    }

    fn generate_reading(&self, rng: &mut impl Rng, timestamp: u32) -> SensorReading {
        let (error_flag, error_type) = if self.ranges.fault_ratio > 0.0
            && rng.random_bool(self.ranges.fault_ratio.clamp(0.0, 1.0))
        {
            let code = match rng.random_range(0..3) {
                0 => ErrorCode::TooLow,
                1 => ErrorCode::TooHigh,
                _ => ErrorCode::SensorFail,
            };
            (true, code)
        } else {
            (false, ErrorCode::None)
        };

        SensorReading {
            sensor_id: self.id,
            timestamp,
            temperature: rng.random_range(self.ranges.temperature_min..self.ranges.temperature_max),
            humidity: rng.random_range(self.ranges.humidity_min..self.ranges.humidity_max),
            error_flag,
            error_type,
        }
    }
}

/// Current epoch milliseconds truncated to the 32-bit batch header field.
pub fn send_millis_now() -> u32 {
    jiff::Timestamp::now().as_millisecond() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(fault_ratio: f64) -> GenerateConfig {
        GenerateConfig {
            temperature_min: 15.0,
            temperature_max: 30.0,
            humidity_min: 30.0,
            humidity_max: 70.0,
            fault_ratio,
        }
    }

    #[test]
    fn batch_has_requested_size_and_consecutive_timestamps() {
        let sensor = SimulatedSensor::new(SensorId(9), ranges(0.0));
        let batch = sensor.next_batch(10);

        assert_eq!(batch.readings.len(), 10);
        let base = batch.readings[0].timestamp;
        for (i, reading) in batch.readings.iter().enumerate() {
            assert_eq!(reading.sensor_id, SensorId(9));
            assert_eq!(reading.timestamp, base.wrapping_add(i as u32));
        }
    }

    #[test]
    fn values_stay_within_configured_ranges() {
        let sensor = SimulatedSensor::new(SensorId(1), ranges(0.0));
        for reading in sensor.next_batch(100).readings {
            assert!((15.0..30.0).contains(&reading.temperature));
            assert!((30.0..70.0).contains(&reading.humidity));
            assert!(!reading.error_flag);
            assert_eq!(reading.error_type, ErrorCode::None);
        }
    }

    #[test]
    fn fault_ratio_one_flags_every_reading() {
        let sensor = SimulatedSensor::new(SensorId(1), ranges(1.0));
        for reading in sensor.next_batch(50).readings {
            assert!(reading.error_flag);
            assert_ne!(reading.error_type, ErrorCode::None);
        }
    }
}
