//! Infrastructure layer: config, logging, transcript files and the in-memory SDK.

pub mod config;
pub mod contracts;
pub mod error;
pub mod logging;
pub mod memory_client;
pub mod secrets;
pub mod transcript_file;

/// Returns the infra module name for smoke checks.
pub fn module_name() -> &'static str {
    "infra"
}
