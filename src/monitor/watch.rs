use crate::server::{DeviceClass, Sample, ServerOperation};

/// One monitored device: its fixed index, the last sample the server
/// reported, and the at-most-one in-flight introspection request.
pub struct DeviceWatch<O> {
    class: DeviceClass,
    index: u32,
    last: Option<Sample>,
    in_flight: Option<O>,
}

impl<O: ServerOperation> DeviceWatch<O> {
    pub fn new(class: DeviceClass, index: u32) -> Self {
        Self {
            class,
            index,
            last: None,
            in_flight: None,
        }
    }

    pub fn class(&self) -> DeviceClass {
        self.class
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn last(&self) -> Option<Sample> {
        self.last
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Install a freshly issued request. The swap drops a superseded
    /// handle, releasing it before the new one takes the slot.
    pub fn begin_query(&mut self, op: O) {
        self.in_flight = Some(op);
    }

    /// Clear the slot once the request reached end-of-data; a still-running
    /// request stays in flight.
    pub fn release_if_complete(&mut self) {
        if self.in_flight.as_ref().is_some_and(O::is_complete) {
            self.in_flight = None;
        }
    }

    pub fn record(&mut self, sample: Sample) {
        self.last = Some(sample);
    }

    pub(crate) fn release(&mut self) {
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeOp {
        complete: Rc<Cell<bool>>,
        released: Rc<Cell<bool>>,
    }

    impl FakeOp {
        fn new(complete: bool) -> (Self, Rc<Cell<bool>>, Rc<Cell<bool>>) {
            let complete = Rc::new(Cell::new(complete));
            let released = Rc::new(Cell::new(false));
            (
                Self { complete: Rc::clone(&complete), released: Rc::clone(&released) },
                complete,
                released,
            )
        }
    }

    impl ServerOperation for FakeOp {
        fn is_complete(&self) -> bool {
            self.complete.get()
        }
    }

    impl Drop for FakeOp {
        fn drop(&mut self) {
            self.released.set(true);
        }
    }

    #[test]
    fn test_begin_query_releases_superseded_handle() {
        let mut watch = DeviceWatch::new(DeviceClass::Output, 0);
        let (first, _, first_released) = FakeOp::new(false);
        let (second, _, second_released) = FakeOp::new(false);

        watch.begin_query(first);
        assert!(!first_released.get());

        watch.begin_query(second);
        assert!(first_released.get());
        assert!(!second_released.get());
        assert!(watch.has_in_flight());
    }

    #[test]
    fn test_release_if_complete_keeps_running_request() {
        let mut watch = DeviceWatch::new(DeviceClass::Input, 3);
        let (op, complete, released) = FakeOp::new(false);
        watch.begin_query(op);

        watch.release_if_complete();
        assert!(watch.has_in_flight());
        assert!(!released.get());

        complete.set(true);
        watch.release_if_complete();
        assert!(!watch.has_in_flight());
        assert!(released.get());
    }

    #[test]
    fn test_release_if_complete_on_empty_slot() {
        let mut watch = DeviceWatch::<FakeOp>::new(DeviceClass::Output, 0);
        watch.release_if_complete();
        assert!(!watch.has_in_flight());
    }

    #[test]
    fn test_record_keeps_only_latest_sample() {
        use crate::server::Volume;

        let mut watch = DeviceWatch::<FakeOp>::new(DeviceClass::Output, 0);
        assert_eq!(watch.last(), None);

        watch.record(Sample { volume: Volume::new(0.50), mute: false });
        watch.record(Sample { volume: Volume::new(0.65), mute: true });
        let last = watch.last().unwrap();
        assert_eq!(last.volume.as_f32(), 0.65);
        assert!(last.mute);
    }
}
