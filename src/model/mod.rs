pub mod config;
pub mod habit;
pub mod task;

pub use config::*;
pub use habit::*;
pub use task::*;
