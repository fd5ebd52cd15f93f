pub mod callbacks;
pub mod session;
pub mod shutdown;
pub mod watch;

pub use callbacks::Callbacks;
pub use session::{MonitorSession, SessionOptions};
pub use shutdown::ShutdownToken;
pub use watch::DeviceWatch;
