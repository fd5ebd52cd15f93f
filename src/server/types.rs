/// Which of the two monitored endpoints a value belongs to: the playback
/// sink ("output") or the capture source ("input").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Output,
    Input,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Output => "output",
            DeviceClass::Input => "input",
        }
    }
}

/// Normalized volume scalar where 1.0 is the server's 100%. Values above
/// 1.0 (over-amplified devices) are passed through verbatim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volume(pub f32);

impl Volume {
    pub fn new(value: f32) -> Self {
        Self(value)
    }

    pub fn as_f32(&self) -> f32 {
        self.0
    }

    pub fn as_percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

/// One completed introspection reading for a device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub volume: Volume,
    pub mute: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Ready,
    Failed,
}

/// The device class a change notification is about. Everything the server
/// can report besides the two watched classes collapses into `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facility {
    Output,
    Input,
    Other,
}
