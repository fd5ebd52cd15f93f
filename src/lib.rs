pub mod clock;
pub mod config;
pub mod error;
pub mod monitor;
pub mod server;

pub use clock::{Clock, SystemClock, Timestamp};
pub use config::{Config, DevicesConfig, MonitorConfig};
pub use error::MonitorError;
pub use monitor::{Callbacks, DeviceWatch, MonitorSession, SessionOptions, ShutdownToken};
pub use server::{AudioServer, ConnectionState, DeviceClass, Facility, Sample, ServerEvent, ServerOperation, Volume};
#[cfg(feature = "pulse")]
pub use server::pulse::PulseServer;
