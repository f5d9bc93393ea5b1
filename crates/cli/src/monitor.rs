//! Monitor mode: print device events, never run actions.

use std::io::{self, Write};

use anyhow::{Context, Result};
use uudev_core::{DeviceSnapshot, DeviceSource, SourceEvent};
use uudev_rules::schema::SEPARATOR;

/// Print every event from `source` until it closes.
pub fn monitor(source: &mut impl DeviceSource, verbose: u8, json: bool) -> Result<()> {
    let stdout = io::stdout();
    loop {
        match source.receive()? {
            SourceEvent::Device(dev) => {
                let mut out = stdout.lock();
                print_event(&mut out, &dev, verbose, json)?;
                out.flush()?;
            }
            SourceEvent::Pending => source.wait_ready()?,
            SourceEvent::Closed => return Ok(()),
        }
    }
}

fn print_event(out: &mut impl Write, dev: &DeviceSnapshot, verbose: u8, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(dev).context("failed to encode event")?;
        writeln!(out, "{line}")?;
        return Ok(());
    }
    writeln!(out, "* {dev}")?;
    if verbose > 0 {
        dev.dump(out)?;
        writeln!(out, "{SEPARATOR}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev() -> DeviceSnapshot {
        DeviceSnapshot::builder("remove", "/devices/usb1/1-2")
            .property("SUBSYSTEM", "usb")
            .build()
    }

    fn render(verbose: u8, json: bool) -> String {
        let mut out = Vec::new();
        print_event(&mut out, &dev(), verbose, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_line_per_event() {
        assert_eq!(render(0, false), "* remove /devices/usb1/1-2\n");
    }

    #[test]
    fn verbose_adds_dump() {
        assert_eq!(
            render(1, false),
            format!("* remove /devices/usb1/1-2\nSUBSYSTEM=usb\n{SEPARATOR}\n")
        );
    }

    #[test]
    fn json_is_one_object_per_line() {
        let text = render(0, true);
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["devpath"], "/devices/usb1/1-2");
        assert_eq!(value["properties"]["SUBSYSTEM"], "usb");
    }
}
