//! Result records returned by the recommendation engines

use crate::graph::EntityId;
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

/// One group similar to the query group, by shared topics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarGroup {
    pub group: EntityId,
    pub name: String,
    pub shared_count: usize,
    /// Shared topic names, sorted ascending
    pub shared_topics: Vec<String>,
}

/// One group recommended to a member, by weighted interest match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRecommendation {
    pub group: EntityId,
    pub name: String,
    pub score: f64,
    /// Matched topic names, sorted ascending
    pub matched_topics: Vec<String>,
}

/// One attended event with its hosting group, in temporal order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendedEvent {
    pub event: EntityId,
    pub name: String,
    /// Scheduled time shifted into the venue's wall clock (epoch seconds)
    pub effective_time: i64,
    pub group_name: String,
}

impl AttendedEvent {
    /// Effective time as a wall-clock timestamp, when it is representable
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        DateTime::from_timestamp(self.effective_time, 0).map(|t| t.naive_utc())
    }
}

/// One member similar to the query member, by shared attendance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMember {
    pub member: EntityId,
    pub name: String,
    /// Distinct events both members yes-rsvped
    pub shared_events: usize,
}

/// One member ranked by a pluggable affinity score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMember {
    pub member: EntityId,
    pub name: String,
    pub score: f64,
    pub shared_events: usize,
}

/// One group members tend to join after the reference group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextGroup {
    pub group: EntityId,
    pub name: String,
    /// How many members joined this group first after the reference group
    pub times: usize,
}

/// One event shared between two members, as seen by an affinity scorer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedEvent {
    pub event: EntityId,
    /// Scheduled time (epoch seconds, UTC)
    pub time: i64,
    /// Total yes-rsvp count of the event
    pub total_attendees: usize,
}
