//! Consumer-facing recommendation API
//!
//! `Recommender` is the single entry point for recommendation queries.
//! Consumers (the CLI, embedders) call it rather than reaching into the
//! engine functions directly; it validates inputs, applies exclusion
//! filters, and returns ordered result records. All operations are pure
//! reads over the borrowed store.

use crate::graph::{EntityId, GraphResult, MeetupGraph};
use crate::recommend::{
    self, AffinityScorer, AttendedEvent, GroupRecommendation, NextGroup, ScoredMember,
    SimilarGroup, SimilarMember, TopicWeights,
};

/// Read-only recommendation facade over a meetup graph
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'g> {
    graph: &'g MeetupGraph,
}

impl<'g> Recommender<'g> {
    /// Create a recommender over the given store
    pub fn new(graph: &'g MeetupGraph) -> Self {
        Self { graph }
    }

    /// Groups sharing topics with the given group, most overlap first
    pub fn similar_groups(&self, group: &EntityId) -> GraphResult<Vec<SimilarGroup>> {
        recommend::similar_groups(self.graph, group)
    }

    /// Groups matching the member's interests, excluding current memberships
    ///
    /// `weights` tunes per-topic contribution; the empty map counts each
    /// matched topic once.
    pub fn recommend_groups(
        &self,
        member: &EntityId,
        weights: &TopicWeights,
    ) -> GraphResult<Vec<GroupRecommendation>> {
        recommend::recommend_groups(self.graph, member, weights)
    }

    /// The member's attended events in effective-time order
    pub fn events_attended(&self, member: &EntityId) -> GraphResult<Vec<AttendedEvent>> {
        recommend::events_attended(self.graph, member)
    }

    /// Members most frequently co-attending events with the given member
    pub fn similar_members(
        &self,
        member: &EntityId,
        top_n: usize,
    ) -> GraphResult<Vec<SimilarMember>> {
        recommend::similar_members(self.graph, member, top_n)
    }

    /// Co-attendance ranking under a caller-supplied affinity policy
    pub fn similar_members_scored(
        &self,
        member: &EntityId,
        top_n: usize,
        scorer: &dyn AffinityScorer,
    ) -> GraphResult<Vec<ScoredMember>> {
        recommend::similar_members_scored(self.graph, member, top_n, scorer)
    }

    /// Groups members joined first after joining the given group
    pub fn next_groups(&self, group: &EntityId) -> GraphResult<Vec<NextGroup>> {
        recommend::next_groups(self.graph, group)
    }

    /// Resolve a group argument as an id, falling back to a unique name
    pub fn resolve_group(&self, key: &str) -> GraphResult<EntityId> {
        let id = EntityId::from(key);
        if self.graph.group(&id).is_some() {
            return Ok(id);
        }
        self.graph.group_named(key).cloned()
    }

    /// Resolve a member argument as an id, falling back to a unique name
    pub fn resolve_member(&self, key: &str) -> GraphResult<EntityId> {
        let id = EntityId::from(key);
        if self.graph.member(&id).is_some() {
            return Ok(id);
        }
        self.graph.member_named(key).cloned()
    }
}
