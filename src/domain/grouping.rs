//! Transcript grouping.
//!
//! Decides which messages open a new author group (full header with name and
//! avatar) and which continue the previous group, and where calendar-day
//! separators go. The computation walks the transcript from newest to oldest,
//! comparing every message with its immediate predecessor in time, and the
//! result is flipped back to oldest-first for display.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{calendar::CalendarZone, ids::MessageId, message::MessageRecord};

const MS_PER_MINUTE: i64 = 60_000;

/// Default maximum gap between two messages of one group.
pub const DEFAULT_TAIL_WINDOW_MINUTES: u32 = 7;

/// Order of the records handed to [`group_messages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Tunable grouping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingPolicy {
    /// A gap of this many minutes or more starts a new group.
    pub tail_window_minutes: u32,
}

impl Default for GroupingPolicy {
    fn default() -> Self {
        Self {
            tail_window_minutes: DEFAULT_TAIL_WINDOW_MINUTES,
        }
    }
}

impl GroupingPolicy {
    fn tail_window_ms(&self) -> i64 {
        i64::from(self.tail_window_minutes) * MS_PER_MINUTE
    }
}

/// One instruction for the transcript renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDirective {
    /// Render a message; `is_tail == false` means a group head.
    Message { message_id: MessageId, is_tail: bool },
    /// Calendar-day boundary before the next message.
    DateSeparator { day: NaiveDate },
}

impl RenderDirective {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            RenderDirective::Message { message_id, .. } => Some(message_id),
            RenderDirective::DateSeparator { .. } => None,
        }
    }
}

/// Groups a transcript into render directives, oldest message first.
///
/// `messages` is read in the declared `order`. Timestamps are never trusted to
/// be sorted: an out-of-order pair just yields a negative gap, which cannot
/// break a group on its own.
pub fn group_messages(
    messages: &[MessageRecord],
    order: TranscriptOrder,
    zone: &CalendarZone,
    policy: &GroupingPolicy,
) -> Vec<RenderDirective> {
    let newest_first: Vec<&MessageRecord> = match order {
        TranscriptOrder::NewestFirst => messages.iter().collect(),
        TranscriptOrder::OldestFirst => messages.iter().rev().collect(),
    };

    let mut directives = Vec::with_capacity(messages.len() * 2);

    for (index, current) in newest_first.iter().enumerate() {
        let older = newest_first.get(index + 1).copied();
        let mut separator = None;

        let is_tail = match older {
            Some(older) => {
                let day = zone.day_of(current.created_at_ms);
                if day.is_some() && day != zone.day_of(older.created_at_ms) {
                    separator = day;
                }

                continues_group(current, older, policy)
            }
            None => false,
        };

        directives.push(RenderDirective::Message {
            message_id: current.id.clone(),
            is_tail,
        });

        if let Some(day) = separator {
            directives.push(RenderDirective::DateSeparator { day });
        }
    }

    directives.reverse();
    directives
}

/// Returns true when `current` may be drawn under the header of `older`, its
/// immediate predecessor in time.
fn continues_group(
    current: &MessageRecord,
    older: &MessageRecord,
    policy: &GroupingPolicy,
) -> bool {
    let gap_ms = current.created_at_ms.saturating_sub(older.created_at_ms);

    current.author_id == older.author_id
        && gap_ms < policy.tail_window_ms()
        && current.same_masquerade(older)
        && !current.system_message
        && !older.system_message
        && !current.is_reply()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ids::MessageId, message::Masquerade};
    use crate::test_support::{at, message, minutes};

    fn utc() -> CalendarZone {
        CalendarZone::utc()
    }

    fn group(messages: &[MessageRecord]) -> Vec<RenderDirective> {
        group_messages(
            messages,
            TranscriptOrder::OldestFirst,
            &utc(),
            &GroupingPolicy::default(),
        )
    }

    fn entry(id: &str, is_tail: bool) -> RenderDirective {
        RenderDirective::Message {
            message_id: MessageId::from(id),
            is_tail,
        }
    }

    fn separator(year: i32, month: u32, day: u32) -> RenderDirective {
        RenderDirective::DateSeparator {
            day: NaiveDate::from_ymd_opt(year, month, day).expect("valid date"),
        }
    }

    fn tails(directives: &[RenderDirective]) -> Vec<(String, bool)> {
        directives
            .iter()
            .filter_map(|directive| match directive {
                RenderDirective::Message {
                    message_id,
                    is_tail,
                } => Some((message_id.to_string(), *is_tail)),
                RenderDirective::DateSeparator { .. } => None,
            })
            .collect()
    }

    #[test]
    fn empty_transcript_yields_nothing() {
        assert!(group(&[]).is_empty());
    }

    #[test]
    fn single_message_is_a_head_without_separator() {
        let messages = vec![message("M1", "A", at("2026-02-14T10:00:00Z"))];

        assert_eq!(group(&messages), vec![entry("M1", false)]);
    }

    #[test]
    fn six_minute_gaps_keep_the_group() {
        let messages = vec![
            message("M1", "A", at("2026-02-14T10:00:00Z")),
            message("M2", "A", at("2026-02-14T10:03:00Z")),
            message("M3", "A", at("2026-02-14T10:09:00Z")),
        ];

        assert_eq!(
            group(&messages),
            vec![entry("M1", false), entry("M2", true), entry("M3", true)]
        );
    }

    #[test]
    fn seven_minute_gap_starts_a_new_group() {
        let messages = vec![
            message("M1", "A", at("2026-02-14T10:00:00Z")),
            message("M2", "A", at("2026-02-14T10:03:00Z")),
            message("M3", "A", at("2026-02-14T10:10:00Z")),
        ];

        assert_eq!(
            group(&messages),
            vec![entry("M1", false), entry("M2", true), entry("M3", false)]
        );
    }

    #[test]
    fn gap_just_under_the_window_is_still_a_tail() {
        let start = at("2026-02-14T10:00:00Z");
        let messages = vec![
            message("M1", "A", start),
            message("M2", "A", start + minutes(7) - 1),
        ];

        assert_eq!(tails(&group(&messages))[1], ("M2".to_owned(), true));
    }

    #[test]
    fn reply_always_starts_a_group() {
        let start = at("2026-02-14T10:00:00Z");
        let mut reply = message("M2", "A", start);
        reply.reply_ids.push(MessageId::from("M1"));
        let messages = vec![message("M1", "A", start), reply];

        assert_eq!(group(&messages), vec![entry("M1", false), entry("M2", false)]);
    }

    #[test]
    fn message_after_a_reply_may_be_its_tail() {
        let start = at("2026-02-14T10:00:00Z");
        let mut reply = message("M1", "A", start);
        reply.reply_ids.push(MessageId::from("M0"));
        let messages = vec![reply, message("M2", "A", start + minutes(1))];

        assert_eq!(group(&messages), vec![entry("M1", false), entry("M2", true)]);
    }

    #[test]
    fn author_change_starts_a_group() {
        let start = at("2026-02-14T10:00:00Z");
        let messages = vec![
            message("M1", "A", start),
            message("M2", "B", start + minutes(1)),
            message("M3", "B", start + minutes(2)),
        ];

        assert_eq!(
            group(&messages),
            vec![entry("M1", false), entry("M2", false), entry("M3", true)]
        );
    }

    #[test]
    fn system_message_breaks_on_both_sides() {
        let start = at("2026-02-14T10:00:00Z");
        let mut notice = message("M2", "A", start + minutes(1));
        notice.system_message = true;
        let messages = vec![
            message("M1", "A", start),
            notice,
            message("M3", "A", start + minutes(2)),
        ];

        assert_eq!(
            group(&messages),
            vec![entry("M1", false), entry("M2", false), entry("M3", false)]
        );
    }

    #[test]
    fn masquerade_change_starts_a_group() {
        let start = at("2026-02-14T10:00:00Z");
        let mut masked = message("M2", "A", start + minutes(1));
        masked.masquerade = Some(Masquerade {
            name: "Bridge".to_owned(),
            avatar: "bridge.png".to_owned(),
        });
        let mut masked_again = masked.clone();
        masked_again.id = MessageId::from("M3");
        masked_again.created_at_ms = start + minutes(2);
        let messages = vec![message("M1", "A", start), masked, masked_again];

        assert_eq!(
            group(&messages),
            vec![entry("M1", false), entry("M2", false), entry("M3", true)]
        );
    }

    #[test]
    fn midnight_crossing_inserts_separator_but_keeps_tail() {
        let messages = vec![
            message("M1", "A", at("2026-02-14T23:58:00Z")),
            message("M2", "A", at("2026-02-15T00:02:00Z")),
        ];

        assert_eq!(
            group(&messages),
            vec![
                entry("M1", false),
                separator(2026, 2, 15),
                entry("M2", true),
            ]
        );
    }

    #[test]
    fn separator_carries_the_newer_day_and_sits_before_it() {
        let messages = vec![
            message("M1", "A", at("2026-02-14T10:00:00Z")),
            message("M2", "B", at("2026-02-16T10:00:00Z")),
            message("M3", "B", at("2026-02-16T10:01:00Z")),
        ];

        assert_eq!(
            group(&messages),
            vec![
                entry("M1", false),
                separator(2026, 2, 16),
                entry("M2", false),
                entry("M3", true),
            ]
        );
    }

    #[test]
    fn day_boundary_follows_the_calendar_zone() {
        let messages = vec![
            message("M1", "A", at("2026-02-14T22:30:00Z")),
            message("M2", "A", at("2026-02-14T23:30:00Z")),
        ];
        let plus_one = "+01:00".parse::<CalendarZone>().expect("zone");

        let in_utc = group(&messages);
        let shifted = group_messages(
            &messages,
            TranscriptOrder::OldestFirst,
            &plus_one,
            &GroupingPolicy::default(),
        );

        assert_eq!(in_utc.len(), 2);
        assert_eq!(shifted[1], separator(2026, 2, 15));
    }

    #[test]
    fn newest_first_input_produces_the_same_presentation() {
        let messages = vec![
            message("M1", "A", at("2026-02-14T23:50:00Z")),
            message("M2", "A", at("2026-02-14T23:55:00Z")),
            message("M3", "B", at("2026-02-15T00:01:00Z")),
            message("M4", "B", at("2026-02-15T00:20:00Z")),
        ];
        let mut reversed = messages.clone();
        reversed.reverse();

        let oldest_first = group(&messages);
        let newest_first = group_messages(
            &reversed,
            TranscriptOrder::NewestFirst,
            &utc(),
            &GroupingPolicy::default(),
        );

        assert_eq!(oldest_first, newest_first);
    }

    #[test]
    fn every_message_is_emitted_exactly_once() {
        let start = at("2026-02-14T20:00:00Z");
        let messages: Vec<_> = (0..40)
            .map(|n| {
                let author = if n % 3 == 0 { "A" } else { "B" };
                message(&format!("M{n}"), author, start + minutes(n * 5))
            })
            .collect();

        let ids: Vec<String> = tails(&group(&messages))
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        let expected: Vec<String> = messages.iter().map(|m| m.id.to_string()).collect();

        assert_eq!(ids, expected);
    }

    #[test]
    fn grouping_is_idempotent() {
        let start = at("2026-02-14T10:00:00Z");
        let messages = vec![
            message("M1", "A", start),
            message("M2", "A", start + minutes(3)),
            message("M3", "B", start + minutes(30)),
        ];

        assert_eq!(group(&messages), group(&messages));
    }

    #[test]
    fn out_of_order_timestamps_do_not_break_the_group() {
        let start = at("2026-02-14T10:00:00Z");
        let messages = vec![
            message("M1", "A", start + minutes(30)),
            message("M2", "A", start),
        ];

        assert_eq!(group(&messages), vec![entry("M1", false), entry("M2", true)]);
    }

    #[test]
    fn extreme_timestamps_degrade_without_panicking() {
        let messages = vec![
            message("M1", "A", i64::MIN),
            message("M2", "A", i64::MAX),
            message("M3", "A", 0),
        ];

        let directives = group(&messages);

        assert_eq!(tails(&directives).len(), 3);
        assert_eq!(tails(&directives)[1], ("M2".to_owned(), false));
    }

    #[test]
    fn wider_window_merges_more_messages() {
        let start = at("2026-02-14T10:00:00Z");
        let messages = vec![
            message("M1", "A", start),
            message("M2", "A", start + minutes(10)),
        ];
        let policy = GroupingPolicy {
            tail_window_minutes: 15,
        };

        let directives = group_messages(&messages, TranscriptOrder::OldestFirst, &utc(), &policy);

        assert_eq!(directives, vec![entry("M1", false), entry("M2", true)]);
    }

    #[test]
    fn message_id_accessor_skips_separators() {
        assert_eq!(
            entry("M1", false).message_id(),
            Some(&MessageId::from("M1"))
        );
        assert_eq!(separator(2026, 1, 1).message_id(), None);
    }
}
