pub mod config;
pub mod device;
pub mod error;
pub mod source;

pub use config::Config;
pub use device::*;
pub use error::*;
pub use source::*;
