pub mod doctor;
pub mod runner;
pub mod summary;

pub use doctor::*;
pub use runner::*;
pub use summary::*;
