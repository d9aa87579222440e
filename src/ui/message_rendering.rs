//! Transcript rendering for the terminal.
//!
//! Turns grouping directives into visual elements:
//! - group heads show time and author on their own line, content below
//! - group tails show time and content on one line
//! - date separators between calendar days

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{
    calendar::CalendarZone,
    channel_view_state::ChannelViewState,
    grouping::RenderDirective,
    ids::MessageId,
    message::{author_display_name, MessageRecord},
    session_state::SessionState,
};

const SELF_LABEL: &str = "You";
const EMPTY_MESSAGE: &str = "[Empty message]";
const SYSTEM_PREFIX: &str = "[System]";
/// Aligns continuation lines with the text after the time column.
const INDENT: &str = "      ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptElement {
    /// Date separator line (e.g., "——— February 14, 2026 ———").
    DateSeparator(String),
    /// A message; `sender` is set only on group heads.
    Message {
        time: String,
        sender: Option<String>,
        content: String,
    },
}

/// Resolves directives against the open channel. Directives naming a
/// message the view does not hold are skipped.
pub fn build_transcript_elements(
    view: &ChannelViewState,
    session: &SessionState,
    directives: &[RenderDirective],
    zone: &CalendarZone,
) -> Vec<TranscriptElement> {
    let by_id: HashMap<&MessageId, &MessageRecord> = view
        .messages()
        .iter()
        .map(|record| (&record.id, record))
        .collect();

    directives
        .iter()
        .filter_map(|directive| match directive {
            RenderDirective::DateSeparator { day } => {
                Some(TranscriptElement::DateSeparator(format_date(*day)))
            }
            RenderDirective::Message {
                message_id,
                is_tail,
            } => {
                let record = by_id.get(message_id)?;
                let sender = (!is_tail).then(|| sender_label(view, session, record));
                Some(TranscriptElement::Message {
                    time: zone.format_time(record.created_at_ms),
                    sender,
                    content: display_content(record),
                })
            }
        })
        .collect()
}

/// Flattens elements into printable lines.
pub fn render_lines(elements: &[TranscriptElement]) -> Vec<String> {
    let mut lines = Vec::new();

    for element in elements {
        match element {
            TranscriptElement::DateSeparator(date) => {
                lines.push(String::new());
                lines.push(format!("——— {date} ———"));
                lines.push(String::new());
            }
            TranscriptElement::Message {
                time,
                sender: Some(sender),
                content,
            } => {
                lines.push(format!("{time:>5} {sender}:"));
                lines.extend(content.lines().map(|line| format!("{INDENT}{line}")));
            }
            TranscriptElement::Message {
                time,
                sender: None,
                content,
            } => {
                let mut content_lines = content.lines();
                let first = content_lines.next().unwrap_or(EMPTY_MESSAGE);
                lines.push(format!("{time:>5} {first}"));
                lines.extend(content_lines.map(|line| format!("{INDENT}{line}")));
            }
        }
    }

    lines
}

fn sender_label(view: &ChannelViewState, session: &SessionState, record: &MessageRecord) -> String {
    if record.masquerade.is_none() && session.is_self(&record.author_id) {
        return SELF_LABEL.to_owned();
    }

    author_display_name(record, view.author(&record.author_id)).to_owned()
}

fn display_content(record: &MessageRecord) -> String {
    let content = if record.content.trim().is_empty() {
        EMPTY_MESSAGE.to_owned()
    } else {
        record.content.clone()
    };

    if record.system_message {
        format!("{SYSTEM_PREFIX} {content}")
    } else {
        content
    }
}

fn format_date(day: NaiveDate) -> String {
    day.format("%B %-d, %Y").to_string()
}
