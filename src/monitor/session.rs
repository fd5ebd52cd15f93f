use std::time::Duration;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::MonitorError;
use crate::server::{AudioServer, ConnectionState, DeviceClass, Facility, Sample, ServerEvent};

use super::callbacks::Callbacks;
use super::shutdown::ShutdownToken;
use super::watch::DeviceWatch;

/// Parameters fixed for the lifetime of a session.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Wall-clock period of one loop iteration.
    pub period: Duration,
    /// Explicit server address, or the server's default when `None`.
    pub server_address: Option<String>,
    pub output_index: u32,
    pub input_index: u32,
}

/// The aggregate root: owns the server connection, the two device watches
/// and the tick loop that keeps them current.
///
/// Everything runs on the caller's thread. The only blocking points are the
/// initial connect-until-ready wait and the end-of-tick sleep that enforces
/// the cadence.
pub struct MonitorSession<S: AudioServer, C: Clock> {
    server: S,
    clock: C,
    period: Duration,
    server_address: Option<String>,
    shutdown: ShutdownToken,
    callbacks: Callbacks,
    connected: bool,
    output: DeviceWatch<S::Operation>,
    input: DeviceWatch<S::Operation>,
    subscription: Option<S::Operation>,
    torn_down: bool,
}

impl<S: AudioServer, C: Clock> MonitorSession<S, C> {
    pub fn new(
        server: S,
        clock: C,
        options: SessionOptions,
        callbacks: Callbacks,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            server,
            clock,
            period: options.period,
            server_address: options.server_address,
            shutdown,
            callbacks,
            connected: false,
            output: DeviceWatch::new(DeviceClass::Output, options.output_index),
            input: DeviceWatch::new(DeviceClass::Input, options.input_index),
            subscription: None,
            torn_down: false,
        }
    }

    /// Connect, watch both devices until the shutdown token fires, then
    /// tear down. Errors are fatal; there is no retry.
    pub fn run(&mut self) -> Result<(), MonitorError> {
        let result = self.connect().and_then(|()| {
            self.start();
            self.run_loop()
        });
        self.teardown();
        result
    }

    /// Issue the connect call and pump until the server reports ready.
    /// Blocks the whole thread; startup happens once.
    pub fn connect(&mut self) -> Result<(), MonitorError> {
        self.server.connect(self.server_address.as_deref())?;
        while !self.connected {
            self.server.pump_once()?;
            for event in self.server.drain_events() {
                self.handle_event(event)?;
            }
        }
        info!("connected to the audio server");
        Ok(())
    }

    /// Issue the initial queries and register for change notifications.
    fn start(&mut self) {
        let op = self.server.query_device(DeviceClass::Output, self.output.index());
        self.output.begin_query(op);
        let op = self.server.query_device(DeviceClass::Input, self.input.index());
        self.input.begin_query(op);
        self.subscription = Some(self.server.subscribe());
        debug!(
            output = self.output.index(),
            input = self.input.index(),
            "initial queries issued, subscribed to change notifications"
        );
    }

    fn run_loop(&mut self) -> Result<(), MonitorError> {
        while !self.shutdown.is_shutdown() {
            self.tick()?;
        }
        Ok(())
    }

    /// One fixed-cadence iteration: pump the event engine once, react to
    /// whatever it delivered, reap finished queries, then sleep until the
    /// absolute deadline taken at the start of the iteration.
    pub fn tick(&mut self) -> Result<(), MonitorError> {
        let start = self.clock.now()?;
        let deadline = start.plus(self.period);

        self.server.pump_once()?;
        for event in self.server.drain_events() {
            self.handle_event(event)?;
        }

        self.output.release_if_complete();
        self.input.release_if_complete();

        self.clock.sleep_until(deadline);
        Ok(())
    }

    fn handle_event(&mut self, event: ServerEvent) -> Result<(), MonitorError> {
        match event {
            ServerEvent::Connection(ConnectionState::Ready) => {
                self.connected = true;
            }
            ServerEvent::Connection(ConnectionState::Failed) => {
                return Err(MonitorError::ConnectionFailed);
            }
            ServerEvent::DeviceInfo { class, sample } => {
                self.watch_mut(class).record(sample);
                debug!(
                    class = class.as_str(),
                    volume = sample.volume.as_f32(),
                    mute = sample.mute,
                    "device state"
                );
                self.callbacks.dispatch(class, sample);
            }
            ServerEvent::Changed { facility, index } => self.handle_change(facility, index),
        }
        Ok(())
    }

    /// A change notification carries no values, only "something in this
    /// class changed"; the watch re-queries its own fixed index.
    fn handle_change(&mut self, facility: Facility, index: u32) {
        let class = match facility {
            Facility::Output => DeviceClass::Output,
            Facility::Input => DeviceClass::Input,
            Facility::Other => return,
        };
        debug!(class = class.as_str(), index, "change notification");
        let watch_index = self.watch_mut(class).index();
        let op = self.server.query_device(class, watch_index);
        self.watch_mut(class).begin_query(op);
    }

    fn watch_mut(&mut self, class: DeviceClass) -> &mut DeviceWatch<S::Operation> {
        match class {
            DeviceClass::Output => &mut self.output,
            DeviceClass::Input => &mut self.input,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn output_sample(&self) -> Option<Sample> {
        self.output.last()
    }

    pub fn input_sample(&self) -> Option<Sample> {
        self.input.last()
    }

    /// Release the subscription and any in-flight queries, then disconnect.
    /// Safe to call more than once; later calls do nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.subscription = None;
        self.output.release();
        self.input.release();
        self.server.disconnect();
        info!("session torn down");
    }
}

impl<S: AudioServer, C: Clock> Drop for MonitorSession<S, C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
