//! Query mode: resolve a device node to its udev device.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::Path;

use anyhow::{bail, Context, Result};
use udev::DeviceType;

use crate::source::describe;

/// Print the devpath of the character or block device at `path`, or all
/// of its properties when `verbose` is set.
pub fn query(path: &Path, verbose: u8) -> Result<()> {
    let meta = fs::metadata(path).with_context(|| format!("{}", path.display()))?;
    let file_type = meta.file_type();
    let kind = if file_type.is_char_device() {
        DeviceType::Character
    } else if file_type.is_block_device() {
        DeviceType::Block
    } else {
        bail!("{}: not a character or block device", path.display());
    };

    let device = udev::Device::from_devnum(kind, meta.rdev())
        .with_context(|| format!("{}: could not find device path", path.display()))?;
    let devpath = device.devpath().to_string_lossy().into_owned();

    let mut out = io::stdout().lock();
    if verbose > 0 {
        let action = device
            .action()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();
        describe(&device, action, devpath).dump(&mut out)?;
    } else {
        writeln!(out, "{devpath}")?;
    }
    Ok(())
}
