//! Entity representation in the meetup graph

use serde::{Deserialize, Serialize};

/// Stable external identifier for an entity
///
/// Ids are supplied by the ingestion layer (the upstream events API assigns
/// them); the core never generates ids. Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an EntityId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Entity labels, one per node kind in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityLabel {
    Group,
    Topic,
    Member,
    Event,
}

impl EntityLabel {
    /// Lowercase label name as stored in snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Group => "group",
            EntityLabel::Topic => "topic",
            EntityLabel::Member => "member",
            EntityLabel::Event => "event",
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(EntityLabel::Group),
            "topic" => Ok(EntityLabel::Topic),
            "member" => Ok(EntityLabel::Member),
            "event" => Ok(EntityLabel::Event),
            other => Err(format!("unknown entity label '{other}'")),
        }
    }
}

/// A meetup community, topically tagged
///
/// Attributes are set once at first creation; later upserts of the same id
/// leave them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub urlname: String,
    pub rating: f64,
    pub link: String,
    /// Creation time of the group upstream (epoch seconds)
    pub created: i64,
}

/// A tag shared across groups and members, used for content similarity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub urlkey: String,
}

/// A person, with declared interests and group affiliations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
}

/// A scheduled occurrence hosted by exactly one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    /// Scheduled time (epoch seconds, UTC)
    pub time: i64,
    /// Offset of the venue's wall clock from UTC (seconds)
    pub utc_offset: i64,
}

impl Event {
    /// Effective display time: scheduled time shifted into the venue's wall clock
    pub fn effective_time(&self) -> i64 {
        self.time + self.utc_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::from("group-42");
        assert_eq!(id.as_str(), "group-42");
        assert_eq!(id.to_string(), "group-42");
    }

    #[test]
    fn test_label_parse() {
        assert_eq!("member".parse::<EntityLabel>().unwrap(), EntityLabel::Member);
        assert!("venue".parse::<EntityLabel>().is_err());
    }

    #[test]
    fn test_effective_time_applies_offset() {
        let event = Event {
            name: "Intro to Graphs".into(),
            time: 1_000,
            utc_offset: -3_600,
        };
        assert_eq!(event.effective_time(), -2_600);
    }
}
