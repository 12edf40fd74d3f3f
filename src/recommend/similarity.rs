//! Content-based similarity: topic overlap and weighted interest scoring
//!
//! Both traversals pivot through the topic→groups adjacency, so cost is
//! bounded by the degree of the topics involved, never by the total number
//! of groups.

use super::types::{GroupRecommendation, SimilarGroup};
use crate::graph::{EntityId, GraphResult, MeetupGraph};
use std::collections::HashMap;

/// Topic weight map for interest scoring
///
/// Keys are topic display names; topics not listed score the default weight
/// of 1.0, so the empty map reproduces plain overlap counting.
#[derive(Debug, Clone, Default)]
pub struct TopicWeights {
    weights: HashMap<String, f64>,
}

impl TopicWeights {
    /// Create an empty weight map (all topics weigh 1.0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight for a topic name
    pub fn with(mut self, topic: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(topic.into(), weight);
        self
    }

    /// Weight for a topic name, defaulting to 1.0 when unlisted
    pub fn weight_for(&self, topic: &str) -> f64 {
        self.weights.get(topic).copied().unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TopicWeights {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Groups sharing at least one topic with the query group
///
/// Ordered by shared-topic count descending, ties by group name then id
/// ascending.
pub fn similar_groups(graph: &MeetupGraph, group: &EntityId) -> GraphResult<Vec<SimilarGroup>> {
    graph.require_group_entity(group)?;

    let mut shared: HashMap<&EntityId, Vec<&str>> = HashMap::new();
    for topic_id in graph.topics_of(group) {
        let Some(topic) = graph.topic(topic_id) else {
            continue;
        };
        for other in graph.groups_with_topic(topic_id) {
            if other == group {
                continue;
            }
            shared.entry(other).or_default().push(&topic.name);
        }
    }

    let mut results: Vec<SimilarGroup> = shared
        .into_iter()
        .filter_map(|(id, mut topics)| {
            let other = graph.group(id)?;
            topics.sort_unstable();
            Some(SimilarGroup {
                group: id.clone(),
                name: other.name.clone(),
                shared_count: topics.len(),
                shared_topics: topics.into_iter().map(String::from).collect(),
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.shared_count
            .cmp(&a.shared_count)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.group.cmp(&b.group))
    });
    Ok(results)
}

/// Groups matching a member's declared interests, excluding current memberships
///
/// Each matched topic contributes its weight (default 1.0); ordered by score
/// descending, ties by group name then id ascending. The empty weight map
/// yields plain match counting.
pub fn recommend_groups(
    graph: &MeetupGraph,
    member: &EntityId,
    weights: &TopicWeights,
) -> GraphResult<Vec<GroupRecommendation>> {
    graph.require_member_entity(member)?;

    let mut matched: HashMap<&EntityId, Vec<&str>> = HashMap::new();
    for topic_id in graph.interests_of(member) {
        let Some(topic) = graph.topic(topic_id) else {
            continue;
        };
        for group in graph.groups_with_topic(topic_id) {
            if graph.is_member_of(member, group) {
                continue;
            }
            matched.entry(group).or_default().push(&topic.name);
        }
    }

    let mut results: Vec<GroupRecommendation> = matched
        .into_iter()
        .filter_map(|(id, mut topics)| {
            let group = graph.group(id)?;
            topics.sort_unstable();
            let score = topics.iter().map(|t| weights.weight_for(t)).sum();
            Some(GroupRecommendation {
                group: id.clone(),
                name: group.name.clone(),
                score,
                matched_topics: topics.into_iter().map(String::from).collect(),
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.group.cmp(&b.group))
    });
    Ok(results)
}
