//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod channel_session;
pub mod compose;
pub mod context;
pub mod contracts;
pub mod load_messages;
pub mod login;
pub mod send_message;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
