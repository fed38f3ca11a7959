pub mod config;
pub mod dispatch;
pub mod generate;
pub mod report;
pub mod transport;

pub use config::{
    BatchConfig, Config, FleetConfig, GenerateConfig, RunConfig, TargetConfig, TransportConfig,
};
pub use dispatch::Dispatcher;
pub use generate::SimulatedSensor;
pub use report::{RunSummary, SendOutcome};
pub use transport::http::HttpTransport;
pub use transport::mock::MockTransport;
pub use transport::tcp::TcpTransport;
pub use transport::{SendAck, Transport, TransportError};
