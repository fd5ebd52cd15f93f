#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Clock read failed: {0}")]
    Clock(String),
    #[error("Failed to set up the audio server client: {0}")]
    Setup(String),
    #[error("Connect call failed: {0}")]
    Connect(String),
    #[error("Audio server connection entered the failed state")]
    ConnectionFailed,
    #[error("Event loop pump failed: {0}")]
    Pump(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
