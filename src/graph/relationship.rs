//! Typed directed relationships between entities

use super::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Relationship types, one per edge kind in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelKind {
    /// Group → Topic
    HasTopic,
    /// Member → Group, carries the join timestamp
    MemberOf,
    /// Member → Group, at most one recorded organiser per group
    Organises,
    /// Group → Event, exactly one host per event
    HostedEvent,
    /// Member → Event, keyed by rsvp id
    Rsvpd,
    /// Member → Topic
    InterestedIn,
}

impl RelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelKind::HasTopic => "HAS_TOPIC",
            RelKind::MemberOf => "MEMBER_OF",
            RelKind::Organises => "ORGANISES",
            RelKind::HostedEvent => "HOSTED_EVENT",
            RelKind::Rsvpd => "RSVPD",
            RelKind::InterestedIn => "INTERESTED_IN",
        }
    }
}

impl std::fmt::Display for RelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member's recorded response to an event
///
/// Upstream responses are free-form strings; anything beyond yes/no/maybe is
/// preserved verbatim. Only `Yes` counts as attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RsvpResponse {
    Yes,
    No,
    Maybe,
    Other(String),
}

impl RsvpResponse {
    /// Whether this response counts as attendance
    pub fn is_attendance(&self) -> bool {
        matches!(self, RsvpResponse::Yes)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RsvpResponse::Yes => "yes",
            RsvpResponse::No => "no",
            RsvpResponse::Maybe => "maybe",
            RsvpResponse::Other(s) => s,
        }
    }
}

impl From<String> for RsvpResponse {
    fn from(s: String) -> Self {
        match s.as_str() {
            "yes" => RsvpResponse::Yes,
            "no" => RsvpResponse::No,
            "maybe" => RsvpResponse::Maybe,
            _ => RsvpResponse::Other(s),
        }
    }
}

impl From<&str> for RsvpResponse {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<RsvpResponse> for String {
    fn from(r: RsvpResponse) -> Self {
        r.as_str().to_string()
    }
}

/// MEMBER_OF payload: one group affiliation with its join timestamp
///
/// `joined` is set when the edge is created and never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub group: EntityId,
    /// Join time (epoch seconds)
    pub joined: i64,
}

/// RSVPD payload: one historical response, keyed by rsvp id
///
/// A member may carry several rsvps to the same event when the ids differ
/// (distinct historical responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rsvp {
    /// Upstream rsvp id, the dedup key for this edge
    pub id: String,
    pub event: EntityId,
    /// When the rsvp was created (epoch seconds)
    pub created: i64,
    /// When the rsvp was last modified (epoch seconds)
    pub last_modified: i64,
    pub response: RsvpResponse,
}

/// A fully-specified edge, the single upsert payload and snapshot row
///
/// Direction is fixed per variant; payload-carrying kinds embed their
/// properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    HasTopic {
        group: EntityId,
        topic: EntityId,
    },
    MemberOf {
        member: EntityId,
        group: EntityId,
        joined: i64,
    },
    Organises {
        member: EntityId,
        group: EntityId,
    },
    HostedEvent {
        group: EntityId,
        event: EntityId,
    },
    Rsvpd {
        member: EntityId,
        rsvp: Rsvp,
    },
    InterestedIn {
        member: EntityId,
        topic: EntityId,
    },
}

impl Relationship {
    pub fn kind(&self) -> RelKind {
        match self {
            Relationship::HasTopic { .. } => RelKind::HasTopic,
            Relationship::MemberOf { .. } => RelKind::MemberOf,
            Relationship::Organises { .. } => RelKind::Organises,
            Relationship::HostedEvent { .. } => RelKind::HostedEvent,
            Relationship::Rsvpd { .. } => RelKind::Rsvpd,
            Relationship::InterestedIn { .. } => RelKind::InterestedIn,
        }
    }

    /// Source entity id (edge direction is fixed per kind)
    pub fn source(&self) -> &EntityId {
        match self {
            Relationship::HasTopic { group, .. } => group,
            Relationship::MemberOf { member, .. } => member,
            Relationship::Organises { member, .. } => member,
            Relationship::HostedEvent { group, .. } => group,
            Relationship::Rsvpd { member, .. } => member,
            Relationship::InterestedIn { member, .. } => member,
        }
    }

    /// Target entity id
    pub fn target(&self) -> &EntityId {
        match self {
            Relationship::HasTopic { topic, .. } => topic,
            Relationship::MemberOf { group, .. } => group,
            Relationship::Organises { group, .. } => group,
            Relationship::HostedEvent { event, .. } => event,
            Relationship::Rsvpd { rsvp, .. } => &rsvp.event,
            Relationship::InterestedIn { topic, .. } => topic,
        }
    }
}
