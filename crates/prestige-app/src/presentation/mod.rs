pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

pub use error::CommandError;
