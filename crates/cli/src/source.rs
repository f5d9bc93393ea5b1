//! libudev-backed device source.

use std::ffi::OsStr;
use std::os::fd::{AsRawFd, BorrowedFd};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::stat::{major, minor};
use tracing::debug;
use uudev_core::{CoreError, DeviceSnapshot, DeviceSource, SourceEvent};

/// Device events from the udev netlink monitor.
pub struct UdevSource {
    socket: udev::MonitorSocket,
}

impl UdevSource {
    pub fn open() -> std::io::Result<Self> {
        let socket = udev::MonitorBuilder::new()?.listen()?;
        Ok(Self { socket })
    }
}

impl DeviceSource for UdevSource {
    fn receive(&mut self) -> uudev_core::Result<SourceEvent> {
        loop {
            let Some(event) = self.socket.iter().next() else {
                return Ok(SourceEvent::Pending);
            };
            match snapshot(&event) {
                Some(dev) => return Ok(SourceEvent::Device(dev)),
                None => debug!(syspath = %event.syspath().display(), "ignoring event without action or devpath"),
            }
        }
    }

    fn wait_ready(&mut self) -> uudev_core::Result<()> {
        // SAFETY: the descriptor is owned by `self.socket`, which outlives this call.
        let fd = unsafe { BorrowedFd::borrow_raw(self.socket.as_raw_fd()) };
        let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::NONE) {
            Ok(_) | Err(Errno::EINTR) => Ok(()),
            Err(e) => Err(CoreError::Source(format!("poll on udev monitor: {e}"))),
        }
    }
}

fn lossy(s: &OsStr) -> String {
    s.to_string_lossy().into_owned()
}

/// Capture a libudev device as a snapshot.
///
/// Every udev property is copied, the well-known device fields are filled
/// in where udev did not already report them, and aliases come from the
/// space-separated `DEVLINKS` property. Returns `None` when the device has
/// no action or no devpath.
pub fn snapshot(device: &udev::Device) -> Option<DeviceSnapshot> {
    let action = device.action().map(lossy).filter(|a| !a.is_empty())?;
    let devpath = lossy(device.devpath());
    if devpath.is_empty() {
        return None;
    }
    Some(describe(device, action, devpath))
}

/// Snapshot a device looked up outside of an event (query mode).
pub fn describe(device: &udev::Device, action: String, devpath: String) -> DeviceSnapshot {
    let mut builder = DeviceSnapshot::builder(action.clone(), devpath.clone());
    for entry in device.properties() {
        builder = builder.property(lossy(entry.name()), lossy(entry.value()));
    }

    if let Some(links) = device.property_value("DEVLINKS") {
        builder = builder.aliases(lossy(links).split_whitespace().map(str::to_string));
    }

    if !action.is_empty() {
        builder = builder.property_default("ACTION", action);
    }
    builder = builder
        .property_default("DEVPATH", devpath)
        .property_default("SYSPATH", device.syspath().to_string_lossy())
        .property_default("SYSNAME", lossy(device.sysname()));
    if let Some(num) = device.sysnum() {
        builder = builder.property_default("SYSNUM", num.to_string());
    }
    if let Some(node) = device.devnode() {
        builder = builder.property_default("DEVNODE", node.to_string_lossy());
    }
    if let Some(devtype) = device.devtype() {
        builder = builder.property_default("DEVTYPE", lossy(devtype));
    }
    if let Some(subsystem) = device.subsystem() {
        builder = builder.property_default("SUBSYSTEM", lossy(subsystem));
    }
    if let Some(driver) = device.driver() {
        builder = builder.property_default("DRIVER", lossy(driver));
    }
    if let Some(rdev) = device.devnum().filter(|&d| d != 0) {
        builder = builder
            .property_default("MAJOR", major(rdev).to_string())
            .property_default("MINOR", minor(rdev).to_string());
    }
    builder.build()
}
