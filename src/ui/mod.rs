//! UI layer: plain-text rendering of the open channel.

mod message_rendering;
mod typing_indicator;
mod view;

pub use view::render_channel;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
