use crate::domain::{
    calendar::CalendarZone,
    channel_view_state::{ChannelUiState, ChannelViewState},
    grouping::GroupingPolicy,
    session_state::SessionState,
};

use super::{
    message_rendering::{build_transcript_elements, render_lines},
    typing_indicator::typing_indicator_text,
};

/// Renders the open channel as plain text: title, transcript and the typing
/// line when anyone is typing.
pub fn render_channel(
    view: &ChannelViewState,
    session: &SessionState,
    zone: &CalendarZone,
    policy: &GroupingPolicy,
) -> Vec<String> {
    let mut lines = vec![channel_title(view)];

    match view.ui_state() {
        ChannelUiState::Empty => lines.push("Select a channel to view messages".to_owned()),
        ChannelUiState::Loading => lines.push("Loading messages...".to_owned()),
        ChannelUiState::Error => lines.push("Failed to load messages.".to_owned()),
        ChannelUiState::Ready if view.messages().is_empty() => {
            lines.push("No messages in this channel".to_owned());
        }
        ChannelUiState::Ready => {
            let directives = view.directives(zone, policy);
            let elements = build_transcript_elements(view, session, &directives, zone);
            lines.extend(render_lines(&elements));
        }
    }

    if let Some(typing) = typing_indicator_text(&view.typing_names()) {
        lines.push(typing);
    }

    lines
}

fn channel_title(view: &ChannelViewState) -> String {
    match view.channel() {
        Some(channel) => format!("Messages — {}", channel.title()),
        None => "Messages".to_owned(),
    }
}
