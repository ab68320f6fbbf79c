pub mod age;
pub mod remover;
pub mod scanner;

pub use age::*;
pub use remover::*;
pub use scanner::*;
