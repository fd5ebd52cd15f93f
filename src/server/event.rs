use super::types::{ConnectionState, DeviceClass, Facility, Sample};

/// Everything the server pushed during a pump, handed to the session as
/// plain values instead of mutating shared state from inside callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ServerEvent {
    /// The connection transitioned to ready or failed.
    Connection(ConnectionState),
    /// A non-terminal introspection response for one watched device.
    DeviceInfo { class: DeviceClass, sample: Sample },
    /// A content-free change notification; the new state must be re-queried.
    Changed { facility: Facility, index: u32 },
}
