use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use libpulse_binding as pulse;
use pulse::callbacks::ListResult;
use pulse::context::subscribe::{Facility as PaFacility, InterestMaskSet};
use pulse::context::{Context, FlagSet as ContextFlagSet, State as ContextState};
use pulse::mainloop::standard::{IterateResult, Mainloop};
use pulse::operation::{Operation, State as OperationState};
use pulse::proplist::{properties, Proplist};
use pulse::volume::Volume as PaVolume;

use super::event::ServerEvent;
use super::types::{ConnectionState, DeviceClass, Facility, Sample, Volume};
use super::{AudioServer, ServerOperation};
use crate::error::MonitorError;

const APPLICATION_NAME: &str = "pulsewatch";

type EventQueue = Rc<RefCell<VecDeque<ServerEvent>>>;

/// PulseAudio backend over the standard (single-threaded, hand-pumped)
/// mainloop. Introspection and subscription callbacks run inside
/// [`pump_once`] and push [`ServerEvent`]s onto a queue the session drains.
///
/// [`pump_once`]: AudioServer::pump_once
pub struct PulseServer {
    mainloop: Mainloop,
    context: Context,
    events: EventQueue,
    last_state: ContextState,
}

impl PulseServer {
    pub fn new() -> Result<Self, MonitorError> {
        let mainloop = Mainloop::new()
            .ok_or_else(|| MonitorError::Setup("failed to create a mainloop".to_string()))?;
        let mut proplist = Proplist::new()
            .ok_or_else(|| MonitorError::Setup("failed to create a proplist".to_string()))?;
        proplist
            .set_str(properties::APPLICATION_NAME, APPLICATION_NAME)
            .map_err(|_| MonitorError::Setup("failed to set the application name".to_string()))?;
        let context = Context::new_with_proplist(&mainloop, APPLICATION_NAME, &proplist)
            .ok_or_else(|| MonitorError::Setup("failed to create a context".to_string()))?;

        Ok(Self {
            mainloop,
            context,
            events: Rc::new(RefCell::new(VecDeque::new())),
            last_state: ContextState::Unconnected,
        })
    }

    fn poll_connection_state(&mut self) {
        let state = self.context.get_state();
        if state == self.last_state {
            return;
        }
        self.last_state = state;
        match state {
            ContextState::Ready => {
                self.events
                    .borrow_mut()
                    .push_back(ServerEvent::Connection(ConnectionState::Ready));
            }
            ContextState::Failed | ContextState::Terminated => {
                self.events
                    .borrow_mut()
                    .push_back(ServerEvent::Connection(ConnectionState::Failed));
            }
            _ => {}
        }
    }
}

fn normalize(avg: PaVolume) -> f32 {
    avg.0 as f32 / PaVolume::NORMAL.0 as f32
}

/// Object-safe view over `Operation<T>` so sink, source and subscribe
/// operations share one handle type.
trait PulseOp {
    fn state(&self) -> OperationState;
    fn cancel(&mut self);
}

impl<T: ?Sized> PulseOp for Operation<T> {
    fn state(&self) -> OperationState {
        self.get_state()
    }

    fn cancel(&mut self) {
        Operation::cancel(self);
    }
}

/// Owned handle over one pending request; cancelled on drop while still
/// running, so a superseded query can no longer deliver events.
pub struct PulseOperation {
    inner: Box<dyn PulseOp>,
}

impl ServerOperation for PulseOperation {
    fn is_complete(&self) -> bool {
        !matches!(self.inner.state(), OperationState::Running)
    }
}

impl Drop for PulseOperation {
    fn drop(&mut self) {
        if self.inner.state() == OperationState::Running {
            self.inner.cancel();
        }
    }
}

impl AudioServer for PulseServer {
    type Operation = PulseOperation;

    fn connect(&mut self, server: Option<&str>) -> Result<(), MonitorError> {
        self.context
            .connect(server, ContextFlagSet::NOFLAGS, None)
            .map_err(|e| MonitorError::Connect(e.to_string()))
    }

    fn pump_once(&mut self) -> Result<(), MonitorError> {
        match self.mainloop.iterate(false) {
            IterateResult::Success(_) => {
                self.poll_connection_state();
                Ok(())
            }
            IterateResult::Quit(_) => Err(MonitorError::Pump("mainloop quit".to_string())),
            IterateResult::Err(e) => Err(MonitorError::Pump(e.to_string())),
        }
    }

    fn drain_events(&mut self) -> Vec<ServerEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    fn query_device(&mut self, class: DeviceClass, index: u32) -> PulseOperation {
        let introspect = self.context.introspect();
        let events = Rc::clone(&self.events);
        let inner: Box<dyn PulseOp> = match class {
            DeviceClass::Output => Box::new(introspect.get_sink_info_by_index(index, move |list| {
                if let ListResult::Item(info) = list {
                    let sample = Sample {
                        volume: Volume::new(normalize(info.volume.avg())),
                        mute: info.mute,
                    };
                    events.borrow_mut().push_back(ServerEvent::DeviceInfo {
                        class: DeviceClass::Output,
                        sample,
                    });
                }
            })),
            DeviceClass::Input => Box::new(introspect.get_source_info_by_index(index, move |list| {
                if let ListResult::Item(info) = list {
                    let sample = Sample {
                        volume: Volume::new(normalize(info.volume.avg())),
                        mute: info.mute,
                    };
                    events.borrow_mut().push_back(ServerEvent::DeviceInfo {
                        class: DeviceClass::Input,
                        sample,
                    });
                }
            })),
        };
        PulseOperation { inner }
    }

    fn subscribe(&mut self) -> PulseOperation {
        let events = Rc::clone(&self.events);
        self.context.set_subscribe_callback(Some(Box::new(move |facility, _operation, index| {
            let facility = match facility {
                Some(PaFacility::Sink) => Facility::Output,
                Some(PaFacility::Source) => Facility::Input,
                _ => Facility::Other,
            };
            events.borrow_mut().push_back(ServerEvent::Changed { facility, index });
        })));
        let op = self
            .context
            .subscribe(InterestMaskSet::SINK | InterestMaskSet::SOURCE, |_| {});
        PulseOperation { inner: Box::new(op) }
    }

    fn disconnect(&mut self) {
        self.context.disconnect();
    }
}
