use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no configuration path: set -c, UUDEV_CONF, XDG_CONFIG_HOME or HOME")]
    NoConfigPath,

    #[error("device source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
