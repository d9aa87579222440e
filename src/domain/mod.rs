//! Domain layer: core entities and business rules.

pub mod calendar;
pub mod channel;
pub mod channel_view_state;
pub mod events;
pub mod grouping;
pub mod ids;
pub mod message;
pub mod session_state;
pub mod typing_state;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
