use std::fmt;

use crate::server::{DeviceClass, Sample};

/// Invoked with the raw normalized volume and the mute flag each time a
/// completed query reports a device's state. Runs on the thread pumping the
/// event loop; it must not block or re-enter the session.
pub type DeviceCallback = Box<dyn FnMut(f32, bool)>;

/// The caller-supplied pair of sinks for device state, one per watched
/// class. Closures own whatever context the caller needs.
pub struct Callbacks {
    on_output: DeviceCallback,
    on_input: DeviceCallback,
}

impl Callbacks {
    pub fn new(
        on_output: impl FnMut(f32, bool) + 'static,
        on_input: impl FnMut(f32, bool) + 'static,
    ) -> Self {
        Self {
            on_output: Box::new(on_output),
            on_input: Box::new(on_input),
        }
    }

    pub(crate) fn dispatch(&mut self, class: DeviceClass, sample: Sample) {
        let callback = match class {
            DeviceClass::Output => &mut self.on_output,
            DeviceClass::Input => &mut self.on_input,
        };
        callback(sample.volume.as_f32(), sample.mute);
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callbacks { .. }")
    }
}
