//! CLI command implementations

pub mod create;
pub mod log;

pub use create::CreateArgs;
pub use log::LogArgs;
