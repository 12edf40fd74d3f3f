//! Collaborative filtering: co-attendance aggregation
//!
//! The traversal collects, per candidate member, the distinct events both
//! members yes-rsvped. Ranking policy is pluggable through `AffinityScorer`
//! so it can evolve without touching the traversal.

use super::types::{ScoredMember, SharedEvent, SimilarMember};
use crate::graph::{EntityId, GraphResult, MeetupGraph};
use std::collections::HashMap;

/// Default result cap for similar-member queries
pub const DEFAULT_TOP_N: usize = 10;

/// Scoring policy over the shared events of a candidate member
pub trait AffinityScorer {
    fn score(&self, shared: &[SharedEvent]) -> f64;
}

/// The default policy: one point per distinct shared event
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedEventCount;

impl AffinityScorer for SharedEventCount {
    fn score(&self, shared: &[SharedEvent]) -> f64 {
        shared.len() as f64
    }
}

/// Recency- and crowd-aware policy
///
/// Each shared event contributes a half-life decay over its age, damped by
/// the event's total attendance — two people at a ten-person event are far
/// more likely to have met than at a thousand-person one.
#[derive(Debug, Clone, Copy)]
pub struct RecencyWeighted {
    /// Reference instant ages are measured against (epoch seconds)
    pub reference_time: i64,
    /// Decay half-life in seconds
    pub half_life: f64,
}

impl RecencyWeighted {
    /// One week, matching a typical meetup cadence
    pub const DEFAULT_HALF_LIFE: f64 = 7.0 * 24.0 * 3600.0;

    pub fn new(reference_time: i64) -> Self {
        Self {
            reference_time,
            half_life: Self::DEFAULT_HALF_LIFE,
        }
    }
}

impl AffinityScorer for RecencyWeighted {
    fn score(&self, shared: &[SharedEvent]) -> f64 {
        shared
            .iter()
            .map(|e| {
                let age = (self.reference_time - e.time).max(0) as f64;
                let recency = 0.5_f64.powf(age / self.half_life);
                recency / e.total_attendees.max(1) as f64
            })
            .sum()
    }
}

/// Shared yes-rsvp events per other member
fn shared_events_by_member(
    graph: &MeetupGraph,
    member: &EntityId,
) -> GraphResult<HashMap<EntityId, Vec<SharedEvent>>> {
    graph.require_member_entity(member)?;

    let mut shared: HashMap<EntityId, Vec<SharedEvent>> = HashMap::new();
    for event_id in graph.events_attended_by(member) {
        let Some(event) = graph.event(event_id) else {
            continue;
        };
        let attendees = graph.attendees_of(event_id);
        for other in attendees {
            if other == member {
                continue;
            }
            shared.entry(other.clone()).or_default().push(SharedEvent {
                event: event_id.clone(),
                time: event.time,
                total_attendees: attendees.len(),
            });
        }
    }
    Ok(shared)
}

/// Members who attended the most events together with the query member
///
/// Counts distinct shared events, ordered descending with ties by member
/// name then id ascending, capped at `top_n`.
pub fn similar_members(
    graph: &MeetupGraph,
    member: &EntityId,
    top_n: usize,
) -> GraphResult<Vec<SimilarMember>> {
    let mut results: Vec<SimilarMember> = shared_events_by_member(graph, member)?
        .into_iter()
        .filter_map(|(id, shared)| {
            let other = graph.member(&id)?;
            Some(SimilarMember {
                name: other.name.clone(),
                member: id,
                shared_events: shared.len(),
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.shared_events
            .cmp(&a.shared_events)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.member.cmp(&b.member))
    });
    results.truncate(top_n);
    Ok(results)
}

/// Same traversal as `similar_members`, ranked by a caller-supplied policy
pub fn similar_members_scored(
    graph: &MeetupGraph,
    member: &EntityId,
    top_n: usize,
    scorer: &dyn AffinityScorer,
) -> GraphResult<Vec<ScoredMember>> {
    let mut results: Vec<ScoredMember> = shared_events_by_member(graph, member)?
        .into_iter()
        .filter_map(|(id, shared)| {
            let other = graph.member(&id)?;
            Some(ScoredMember {
                name: other.name.clone(),
                member: id,
                score: scorer.score(&shared),
                shared_events: shared.len(),
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.member.cmp(&b.member))
    });
    results.truncate(top_n);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Event, Member, Relationship, Rsvp};

    fn event(time: i64) -> Event {
        Event {
            name: "Meetup".into(),
            time,
            utc_offset: 0,
        }
    }

    fn rsvp_yes(g: &mut MeetupGraph, n: &mut u32, member: &str, event: &str) {
        *n += 1;
        g.upsert_relationship(Relationship::Rsvpd {
            member: member.into(),
            rsvp: Rsvp {
                id: format!("r{n}"),
                event: event.into(),
                created: 1,
                last_modified: 1,
                response: "yes".into(),
            },
        })
        .unwrap();
    }

    fn co_attendance_graph() -> MeetupGraph {
        let mut g = MeetupGraph::new();
        for m in ["m1", "m2", "m3"] {
            g.upsert_member(m.into(), Member { name: m.to_uppercase() });
        }
        for (e, t) in [("e1", 100), ("e2", 200), ("e3", 300)] {
            g.upsert_event(e.into(), event(t));
        }
        let mut n = 0;
        // m2 shares two events with m1, m3 shares one
        rsvp_yes(&mut g, &mut n, "m1", "e1");
        rsvp_yes(&mut g, &mut n, "m1", "e2");
        rsvp_yes(&mut g, &mut n, "m1", "e3");
        rsvp_yes(&mut g, &mut n, "m2", "e1");
        rsvp_yes(&mut g, &mut n, "m2", "e2");
        rsvp_yes(&mut g, &mut n, "m3", "e3");
        g
    }

    #[test]
    fn test_co_attendance_counts() {
        let g = co_attendance_graph();
        let peers = similar_members(&g, &"m1".into(), DEFAULT_TOP_N).unwrap();

        assert_eq!(peers.len(), 2);
        assert_eq!((peers[0].member.as_str(), peers[0].shared_events), ("m2", 2));
        assert_eq!((peers[1].member.as_str(), peers[1].shared_events), ("m3", 1));
    }

    #[test]
    fn test_top_n_truncates() {
        let g = co_attendance_graph();
        let peers = similar_members(&g, &"m1".into(), 1).unwrap();
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].member.as_str(), "m2");
    }

    #[test]
    fn test_non_yes_responses_do_not_pair_members() {
        let mut g = MeetupGraph::new();
        for m in ["m1", "m2"] {
            g.upsert_member(m.into(), Member { name: m.to_uppercase() });
        }
        g.upsert_event("e1".into(), event(100));
        let mut n = 0;
        rsvp_yes(&mut g, &mut n, "m1", "e1");
        g.upsert_relationship(Relationship::Rsvpd {
            member: "m2".into(),
            rsvp: Rsvp {
                id: "r-no".into(),
                event: "e1".into(),
                created: 1,
                last_modified: 1,
                response: "no".into(),
            },
        })
        .unwrap();

        assert!(similar_members(&g, &"m1".into(), DEFAULT_TOP_N)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_recency_weighted_prefers_recent_small_events() {
        let mut g = MeetupGraph::new();
        for m in ["m1", "m2", "m3", "crowd1", "crowd2"] {
            g.upsert_member(m.into(), Member { name: m.to_uppercase() });
        }
        let week = 7 * 24 * 3600;
        // e-old: m1+m2 alone, long ago; e-new: m1+m3 plus a crowd, recent
        g.upsert_event("e-old".into(), event(0));
        g.upsert_event("e-new".into(), event(10 * week));
        let mut n = 0;
        rsvp_yes(&mut g, &mut n, "m1", "e-old");
        rsvp_yes(&mut g, &mut n, "m2", "e-old");
        rsvp_yes(&mut g, &mut n, "m1", "e-new");
        rsvp_yes(&mut g, &mut n, "m3", "e-new");
        rsvp_yes(&mut g, &mut n, "crowd1", "e-new");
        rsvp_yes(&mut g, &mut n, "crowd2", "e-new");

        let scorer = RecencyWeighted::new(10 * week);
        let ranked = similar_members_scored(&g, &"m1".into(), DEFAULT_TOP_N, &scorer).unwrap();

        // m3: decay 1.0 / 4 attendees = 0.25; m2: decay 0.5^10 / 2 ≈ 0.0005
        assert_eq!(ranked[0].member.as_str(), "m3");
        assert!(ranked[0].score > ranked.last().unwrap().score);
        // the count policy would have ranked them equally
        let counted = similar_members(&g, &"m1".into(), DEFAULT_TOP_N).unwrap();
        assert!(counted.iter().all(|p| p.shared_events == 1));
    }
}
