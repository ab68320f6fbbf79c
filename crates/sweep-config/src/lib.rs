pub mod config;
pub mod email;
pub mod format;

pub use config::*;
pub use email::*;
pub use format::*;
