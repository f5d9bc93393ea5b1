use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Run shell actions when udev reports device events.
///
/// Without `-m` or `-p`, loads the rule file and runs as a daemon until
/// killed.
#[derive(Parser, Debug)]
#[command(name = "uudev", version, about = "Run shell actions on udev device events")]
pub struct CliArgs {
    /// Rule file (default: $UUDEV_CONF, $XDG_CONFIG_HOME/uudev.conf, ~/.config/uudev.conf)
    #[arg(short = 'c', long = "conf", value_name = "CONF")]
    pub conf: Option<PathBuf>,

    /// Increase diagnostics: events and matches, device dumps, script echo
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print device events without running any rules
    #[arg(short, long, conflicts_with = "path")]
    pub monitor: bool,

    /// With --monitor, print each event as one JSON object
    #[arg(long, requires = "monitor")]
    pub json: bool,

    /// Print the devpath of a device node (with -v, all its properties)
    #[arg(short, long, value_name = "DEVICE")]
    pub path: Option<PathBuf>,
}
