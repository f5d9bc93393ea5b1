//! Device notification source abstraction.

use std::collections::VecDeque;

use crate::device::DeviceSnapshot;
use crate::error::Result;

/// Outcome of a single non-blocking receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// A device notification is ready.
    Device(DeviceSnapshot),
    /// Nothing ready yet; call [`DeviceSource::wait_ready`] before retrying.
    Pending,
    /// The source is exhausted and will never yield again.
    Closed,
}

/// A stream of device snapshots.
///
/// `receive` never blocks. `wait_ready` blocks until the next `receive`
/// may yield a device, without busy-polling.
pub trait DeviceSource {
    fn receive(&mut self) -> Result<SourceEvent>;

    fn wait_ready(&mut self) -> Result<()>;
}

/// In-memory source that replays queued events, then reports `Closed`.
#[derive(Debug, Default)]
pub struct QueueSource {
    events: VecDeque<SourceEvent>,
    waits: usize,
}

impl QueueSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_devices(devices: impl IntoIterator<Item = DeviceSnapshot>) -> Self {
        Self {
            events: devices.into_iter().map(SourceEvent::Device).collect(),
            waits: 0,
        }
    }

    pub fn push(&mut self, event: SourceEvent) {
        self.events.push_back(event);
    }

    /// Number of times a caller blocked on [`DeviceSource::wait_ready`].
    pub fn waits(&self) -> usize {
        self.waits
    }
}

impl DeviceSource for QueueSource {
    fn receive(&mut self) -> Result<SourceEvent> {
        Ok(self.events.pop_front().unwrap_or(SourceEvent::Closed))
    }

    fn wait_ready(&mut self) -> Result<()> {
        self.waits += 1;
        Ok(())
    }
}
