//! End-to-end tests: rule file on disk, real `/bin/sh` children.

use std::fs;
use std::io;
use std::process::ExitStatus;

use tempfile::TempDir;
use uudev_core::{DeviceSnapshot, QueueSource};
use uudev_dispatch::{Dispatch, Dispatcher, ExecError, ExecutionRequest, Executor, ShellExecutor};
use uudev_rules::RuleLoader;

/// Shell executor that remembers every script it ran.
#[derive(Default)]
struct CountingShell {
    inner: ShellExecutor,
    scripts: Vec<String>,
}

impl Executor for CountingShell {
    fn run(&mut self, request: &ExecutionRequest<'_>) -> Result<ExitStatus, ExecError> {
        self.scripts.push(String::from_utf8_lossy(&request.text).into_owned());
        self.inner.run(request)
    }

    fn name(&self) -> &str {
        "counting-shell"
    }
}

fn write_conf(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("uudev.conf");
    fs::write(&path, contents).unwrap();
    path
}

fn block(action: &str) -> DeviceSnapshot {
    DeviceSnapshot::builder(action, "/devices/virtual/block/loop0")
        .property("ACTION", action)
        .property("SUBSYSTEM", "block")
        .build()
}

#[test]
fn block_add_runs_bin_true_once() {
    let dir = TempDir::new().unwrap();
    let conf = write_conf(&dir, "* ACTION==\"add\",SUBSYSTEM==\"block\"\n/bin/true\n");
    let report = RuleLoader::new(conf).load().unwrap();

    let mut d = Dispatcher::new(report.rules, CountingShell::default()).with_output(io::sink());

    let added = d.dispatch(&block("add"));
    assert!(matches!(added, Dispatch::Executed(s) if s.success()));
    assert_eq!(d.dispatch(&block("remove")), Dispatch::Skipped);

    assert_eq!(d.executor().scripts, vec!["/bin/true\n".to_string()]);
}

#[test]
fn actions_see_device_environment_and_run_in_order() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("log");
    let conf = write_conf(
        &dir,
        &format!(
            concat!(
                "* ! ?\n",
                "LOG={log}\n",
                "* ! ACTION==\"never\"\n",
                "echo startup >> \"$LOG\"\n",
                "* ? SUBSYSTEM==\"block\"\n",
                "LOG={log}\n",
                "* ACTION==\"add\",DEVLINK==\"/dev/disk/by-label/USB\"\n",
                "echo \"$ACTION $DEVNAME $DEVLINK\" >> \"$LOG\"\n",
            ),
            log = log.display()
        ),
    );
    let report = RuleLoader::new(conf).load().unwrap();
    assert_eq!(report.rules.len(), 4);

    let usb = DeviceSnapshot::builder("add", "/devices/pci0000:00/usb1/1-1/block/sdb")
        .property("ACTION", "add")
        .property("SUBSYSTEM", "block")
        .property("DEVNAME", "/dev/sdb")
        .alias("/dev/disk/by-label/USB")
        .build();
    let other = block("add");

    let mut d = Dispatcher::new(report.rules, ShellExecutor::default()).with_output(io::sink());
    let mut source = QueueSource::from_devices([usb, other]);
    d.run(&mut source).unwrap();

    assert_eq!(
        fs::read_to_string(&log).unwrap(),
        "startup\nadd /dev/sdb /dev/disk/by-label/USB\n"
    );
}

#[test]
fn missing_shell_does_not_abort_dispatch() {
    let dir = TempDir::new().unwrap();
    let conf = write_conf(&dir, "*\ntrue\n");
    let report = RuleLoader::new(conf).load().unwrap();

    let mut d = Dispatcher::new(report.rules, ShellExecutor::new("/nonexistent/sh")).with_output(io::sink());
    let mut source = QueueSource::from_devices([block("add"), block("remove")]);

    assert!(d.run(&mut source).is_ok());
    assert_eq!(d.dispatch(&block("change")), Dispatch::Failed);
}

#[test]
fn malformed_header_does_not_block_later_rules() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let conf = write_conf(
        &dir,
        &format!(
            "* ACTION==\"add\n/bin/false\n* SUBSYSTEM==\"block\"\necho ok > {}\n",
            out.display()
        ),
    );
    let report = RuleLoader::new(conf).load().unwrap();
    assert_eq!(report.failures().next().map(|d| d.line), Some(1));

    let mut d = Dispatcher::new(report.rules, ShellExecutor::default()).with_output(io::sink());
    d.dispatch(&block("add"));

    assert_eq!(fs::read_to_string(&out).unwrap(), "ok\n");
}
