//! UCI protocol front end for cimille.

pub mod command;
pub mod engine;
pub mod error;
pub mod report;

pub use command::{Command, GoParams, UciOption, parse_command};
pub use engine::{EngineConfig, UciEngine};
pub use error::UciError;
