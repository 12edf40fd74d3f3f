//! Normalized ingestion records
//!
//! One record type per stream produced by the upstream acquisition and
//! transformation stage. Field names mirror the normalized tabular output
//! exactly, so record files deserialize without a mapping layer.

use serde::{Deserialize, Serialize};

/// One row of the `groups` stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    pub urlname: String,
    pub rating: f64,
    pub link: String,
    pub created: i64,
    #[serde(rename = "organiserMemberId", default)]
    pub organiser_member_id: Option<String>,
    #[serde(rename = "organiserName", default)]
    pub organiser_name: Option<String>,
}

/// One row of the `groups_topics` stream: a topic and the group carrying it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTopicRecord {
    /// Topic id
    pub id: String,
    pub name: String,
    pub urlkey: String,
    #[serde(rename = "groupId")]
    pub group_id: String,
}

/// One row of the `members` stream
///
/// A member appears once per group affiliation; entity attributes apply on
/// the first row only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "groupId", default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub joined: Option<i64>,
    /// Semicolon-delimited topic ids the member declared interest in
    #[serde(default)]
    pub topics: Option<String>,
}

impl MemberRecord {
    /// Declared interest topic ids, empty entries dropped
    pub fn topic_ids(&self) -> impl Iterator<Item = &str> {
        self.topics
            .as_deref()
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// One row of the `events` stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub name: String,
    pub time: i64,
    pub utc_offset: i64,
    pub group_id: String,
}

/// One row of the `rsvps` stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub rsvp_id: String,
    pub member_id: String,
    pub event_id: String,
    pub created: i64,
    /// Last-modified time of the rsvp
    pub mtime: i64,
    pub response: String,
}
