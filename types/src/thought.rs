use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ThoughtId, UserId};

/// A posted message as the remote store represents it.
///
/// Field names follow the wire format (`_id`, `createdAt`, ...) so the
/// struct deserializes straight out of API responses. `created_by` and
/// `updated_at` only exist on newer records and stay `None` elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    #[serde(rename = "_id")]
    pub id: ThoughtId,
    pub message: String,
    pub hearts: u32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "createdBy", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Thought {
    /// Human age of the thought relative to `now`, e.g. "5 minutes ago".
    ///
    /// Buckets mirror the board UI: seconds under a minute, then minutes,
    /// hours, and days. Future timestamps clamp to "0 seconds ago".
    #[must_use]
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let seconds = (now - self.created_at).num_seconds().max(0);
        if seconds < 60 {
            return format!("{seconds} seconds ago");
        }
        let minutes = seconds / 60;
        if minutes < 60 {
            return format!("{minutes} minute{} ago", plural(minutes));
        }
        let hours = minutes / 60;
        if hours < 24 {
            return format!("{hours} hour{} ago", plural(hours));
        }
        let days = hours / 24;
        format!("{days} day{} ago", plural(days))
    }

    /// True when `user` wrote this thought. Anonymous records never match.
    #[must_use]
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.created_by.as_ref() == Some(user)
    }
}

fn plural(count: i64) -> &'static str {
    if count > 1 { "s" } else { "" }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn wire_thought() -> &'static str {
        r#"{
            "_id": "640f4bce6c8f7a0017f3a9b2",
            "message": "tea is underrated",
            "hearts": 12,
            "createdAt": "2026-03-01T12:00:00.000Z",
            "__v": 0
        }"#
    }

    #[test]
    fn deserializes_wire_names() {
        let thought: Thought = serde_json::from_str(wire_thought()).unwrap();
        assert_eq!(thought.id, ThoughtId::from("640f4bce6c8f7a0017f3a9b2"));
        assert_eq!(thought.message, "tea is underrated");
        assert_eq!(thought.hearts, 12);
        assert_eq!(thought.created_by, None);
        assert_eq!(thought.updated_at, None);
    }

    #[test]
    fn authored_records_carry_creator() {
        let raw = r#"{
            "_id": "a1",
            "message": "signed post",
            "hearts": 0,
            "createdAt": "2026-03-01T12:00:00Z",
            "createdBy": "user-7"
        }"#;
        let thought: Thought = serde_json::from_str(raw).unwrap();
        assert!(thought.is_authored_by(&UserId::from("user-7")));
        assert!(!thought.is_authored_by(&UserId::from("user-8")));
    }

    #[test]
    fn age_label_buckets() {
        let thought: Thought = serde_json::from_str(wire_thought()).unwrap();
        let posted = thought.created_at;

        let cases = [
            (TimeDelta::seconds(1), "1 seconds ago"),
            (TimeDelta::seconds(59), "59 seconds ago"),
            (TimeDelta::seconds(60), "1 minute ago"),
            (TimeDelta::minutes(5), "5 minutes ago"),
            (TimeDelta::hours(1), "1 hour ago"),
            (TimeDelta::hours(23), "23 hours ago"),
            (TimeDelta::hours(24), "1 day ago"),
            (TimeDelta::days(10), "10 days ago"),
        ];
        for (delta, expected) in cases {
            assert_eq!(thought.age_label(posted + delta), expected);
        }
    }

    #[test]
    fn age_label_clamps_future_timestamps() {
        let thought: Thought = serde_json::from_str(wire_thought()).unwrap();
        let earlier = thought.created_at - TimeDelta::seconds(30);
        assert_eq!(thought.age_label(earlier), "0 seconds ago");
    }
}
