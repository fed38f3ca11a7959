use std::path::Path;

use serde::Deserialize;
use swarm_core::SensorId;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    pub fleet: FleetConfig,
    pub batch: BatchConfig,
    pub run: RunConfig,
    pub transport: TransportConfig,
    pub generate: GenerateConfig,
}

/// The endpoint batches are POSTed to.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Hostname or IP of the receiving device.
    pub host: String,
    pub port: u16,
    /// Request path, normally "/data".
    pub path: String,
}

/// Which sensor identities to simulate.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FleetConfig {
    /// `count` consecutive ids starting at `first_id`.
    Range { count: usize, first_id: u8 },
    /// An explicit identity list.
    List { ids: Vec<SensorId> },
}

impl FleetConfig {
    /// Resolve the configured fleet to concrete sensor ids.
    ///
    /// The wire id space is a single byte, so a range wider than 256 wraps
    /// and produces duplicate identities.
    pub fn sensor_ids(&self) -> Vec<SensorId> {
        match self {
            FleetConfig::Range { count, first_id } => (0..*count)
                .map(|i| SensorId(first_id.wrapping_add(i as u8)))
                .collect(),
            FleetConfig::List { ids } => ids.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchConfig {
    /// Readings per batch.
    pub size: usize,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RunConfig {
    /// One send attempt per sensor, then exit.
    Oneshot {
        /// Upper bound on concurrent send tasks.
        max_in_flight: usize,
        /// Each task sleeps a random delay in [0, max_delay_secs) first.
        max_delay_secs: f64,
    },
    /// One repeating loop per sensor until interrupted.
    Periodic {
        /// Seconds between batches per sensor.
        interval_secs: u64,
        /// Random per-send offset so the fleet does not burst in lockstep.
        jitter_secs: f64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    Http {
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    },
    /// Hand-written HTTP POST over a raw socket.
    Tcp {
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    },
    /// Dry run: every send is acknowledged without touching the network.
    Mock,
}

/// Value ranges for synthetic readings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GenerateConfig {
    /// Temperature bounds in degrees Celsius, min exclusive of max.
    pub temperature_min: f32,
    pub temperature_max: f32,
    /// Relative humidity bounds in percent.
    pub humidity_min: f32,
    pub humidity_max: f32,
    /// Fraction of readings flagged as errors, 0.0 to 1.0.
    pub fault_ratio: f64,
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: TargetConfig {
                host: "192.168.0.104".to_string(),
                port: 80,
                path: "/data".to_string(),
            },
            fleet: FleetConfig::Range {
                count: 100,
                first_id: 1,
            },
            batch: BatchConfig { size: 10 },
            run: RunConfig::Oneshot {
                max_in_flight: 50,
                max_delay_secs: 2.0,
            },
            transport: TransportConfig::Http {
                connect_timeout_secs: 2,
                read_timeout_secs: 3,
            },
            generate: GenerateConfig {
                temperature_min: 15.0,
                temperature_max: 30.0,
                humidity_min: 30.0,
                humidity_max: 70.0,
                fault_ratio: 0.0,
            },
        }
    }
}
