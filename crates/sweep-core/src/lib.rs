pub mod error;
pub mod rules;
pub mod size;
pub mod types;

pub use error::*;
pub use rules::*;
pub use size::*;
pub use types::*;
