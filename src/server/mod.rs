pub mod event;
pub mod types;

#[cfg(feature = "pulse")]
pub mod pulse;

pub use event::ServerEvent;
pub use types::{ConnectionState, DeviceClass, Facility, Sample, Volume};

use crate::error::MonitorError;

/// Handle to one asynchronous request issued against the server. Dropping
/// it releases the request; the protocol layer guarantees a released handle
/// delivers no further events.
pub trait ServerOperation {
    /// Whether the underlying request reached end-of-data.
    fn is_complete(&self) -> bool;
}

/// The client-protocol capabilities the monitor consumes. Implementations
/// are single-threaded: every event is produced inside [`pump_once`] and
/// handed over through [`drain_events`] on the same thread.
///
/// [`pump_once`]: AudioServer::pump_once
/// [`drain_events`]: AudioServer::drain_events
pub trait AudioServer {
    type Operation: ServerOperation;

    /// Begin connecting. Readiness or failure is reported asynchronously
    /// via [`ServerEvent::Connection`]; an error here means the connect
    /// call itself failed.
    fn connect(&mut self, server: Option<&str>) -> Result<(), MonitorError>;

    /// Drive the event-dispatch engine once without blocking.
    fn pump_once(&mut self) -> Result<(), MonitorError>;

    /// Take the events queued by previous pumps, oldest first.
    fn drain_events(&mut self) -> Vec<ServerEvent>;

    /// Issue an introspection query for one device's {volume, mute} state.
    /// Requires a ready connection.
    fn query_device(&mut self, class: DeviceClass, index: u32) -> Self::Operation;

    /// Subscribe to change notifications for both watched device classes.
    fn subscribe(&mut self) -> Self::Operation;

    fn disconnect(&mut self);
}
