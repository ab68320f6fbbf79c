pub mod notifier;
pub mod smtp;

pub use notifier::*;
pub use smtp::*;
