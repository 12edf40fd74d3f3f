//! Batch loader: applies normalized record streams through the upsert layer
//!
//! Phases run in dependency order (groups → topics → members → events →
//! rsvps) so intra-batch references resolve. Dangling rows are skipped and
//! counted, never fatal; re-applying an identical batch leaves the graph
//! unchanged and reports every row as matched.

use super::records::{EventRecord, GroupRecord, GroupTopicRecord, MemberRecord, RsvpRecord};
use crate::graph::{
    Event, GraphError, Group, Member, MeetupGraph, Relationship, Rsvp, Topic, Upsert,
};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rows per progress tick, matching the upstream bulk-commit chunk size
const CHUNK_ROWS: usize = 10_000;

/// Errors reading record files
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read a JSON array of records from a file
pub fn read_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, IngestError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Row-level outcome counters for one ingestion phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows that created at least one new entity or edge
    pub created: usize,
    /// Rows fully matched against existing data
    pub matched: usize,
    /// Rows dropped (entirely or partially) over a dangling reference
    pub skipped: usize,
}

impl LoadStats {
    fn record(&mut self, row: RowOutcome) {
        if row.skipped {
            self.skipped += 1;
        } else if row.created {
            self.created += 1;
        } else {
            self.matched += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.matched + self.skipped
    }
}

/// Outcome of applying one record's upserts
#[derive(Debug, Default, Clone, Copy)]
struct RowOutcome {
    created: bool,
    skipped: bool,
}

impl RowOutcome {
    fn absorb(&mut self, upsert: Upsert) {
        self.created |= upsert.created();
    }

    fn apply(&mut self, result: Result<Upsert, GraphError>) {
        match result {
            Ok(upsert) => self.absorb(upsert),
            Err(err) => {
                warn!("skipping dangling row: {err}");
                self.skipped = true;
            }
        }
    }
}

/// Per-phase statistics for one or more ingestion batches
///
/// Additive: feeding several batches through one loader accumulates into a
/// single report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub groups: LoadStats,
    pub group_topics: LoadStats,
    pub members: LoadStats,
    pub events: LoadStats,
    pub rsvps: LoadStats,
}

impl IngestReport {
    /// Total rows dropped over dangling references across all phases
    pub fn skipped(&self) -> usize {
        self.groups.skipped
            + self.group_topics.skipped
            + self.members.skipped
            + self.events.skipped
            + self.rsvps.skipped
    }
}

impl std::fmt::Display for IngestReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<14} {:>8} {:>8} {:>8}", "stream", "created", "matched", "skipped")?;
        for (name, stats) in [
            ("groups", &self.groups),
            ("groups_topics", &self.group_topics),
            ("members", &self.members),
            ("events", &self.events),
            ("rsvps", &self.rsvps),
        ] {
            writeln!(
                f,
                "{:<14} {:>8} {:>8} {:>8}",
                name, stats.created, stats.matched, stats.skipped
            )?;
        }
        Ok(())
    }
}

/// Applies record batches to a graph through the upsert layer
pub struct GraphLoader<'g> {
    graph: &'g mut MeetupGraph,
    report: IngestReport,
}

impl<'g> GraphLoader<'g> {
    pub fn new(graph: &'g mut MeetupGraph) -> Self {
        Self {
            graph,
            report: IngestReport::default(),
        }
    }

    /// Consume the loader, returning the accumulated report
    pub fn finish(self) -> IngestReport {
        self.report
    }

    /// Load the `groups` stream, including organiser members and edges
    pub fn load_groups(&mut self, records: &[GroupRecord]) {
        for (i, rec) in records.iter().enumerate() {
            tick("groups", i);
            let mut row = RowOutcome::default();
            row.absorb(self.graph.upsert_group(
                rec.id.as_str().into(),
                Group {
                    name: rec.name.clone(),
                    urlname: rec.urlname.clone(),
                    rating: rec.rating,
                    link: rec.link.clone(),
                    created: rec.created,
                },
            ));
            if let Some(organiser) = &rec.organiser_member_id {
                row.absorb(self.graph.upsert_member(
                    organiser.as_str().into(),
                    Member {
                        name: rec.organiser_name.clone().unwrap_or_default(),
                    },
                ));
                row.apply(self.graph.upsert_relationship(Relationship::Organises {
                    member: organiser.as_str().into(),
                    group: rec.id.as_str().into(),
                }));
            }
            self.report.groups.record(row);
        }
        info!(rows = records.len(), "loaded groups stream");
    }

    /// Load the `groups_topics` stream: topics and HAS_TOPIC edges
    pub fn load_group_topics(&mut self, records: &[GroupTopicRecord]) {
        for (i, rec) in records.iter().enumerate() {
            tick("groups_topics", i);
            let mut row = RowOutcome::default();
            row.absorb(self.graph.upsert_topic(
                rec.id.as_str().into(),
                Topic {
                    name: rec.name.clone(),
                    urlkey: rec.urlkey.clone(),
                },
            ));
            row.apply(self.graph.upsert_relationship(Relationship::HasTopic {
                group: rec.group_id.as_str().into(),
                topic: rec.id.as_str().into(),
            }));
            self.report.group_topics.record(row);
        }
        info!(rows = records.len(), "loaded groups_topics stream");
    }

    /// Load the `members` stream: members, memberships, declared interests
    pub fn load_members(&mut self, records: &[MemberRecord]) {
        for (i, rec) in records.iter().enumerate() {
            tick("members", i);
            let mut row = RowOutcome::default();
            row.absorb(self.graph.upsert_member(
                rec.id.as_str().into(),
                Member {
                    name: rec.name.clone(),
                },
            ));
            if let (Some(group), Some(joined)) = (&rec.group_id, rec.joined) {
                row.apply(self.graph.upsert_relationship(Relationship::MemberOf {
                    member: rec.id.as_str().into(),
                    group: group.as_str().into(),
                    joined,
                }));
            }
            for topic in rec.topic_ids() {
                row.apply(self.graph.upsert_relationship(Relationship::InterestedIn {
                    member: rec.id.as_str().into(),
                    topic: topic.into(),
                }));
            }
            self.report.members.record(row);
        }
        info!(rows = records.len(), "loaded members stream");
    }

    /// Load the `events` stream: events and HOSTED_EVENT edges
    pub fn load_events(&mut self, records: &[EventRecord]) {
        for (i, rec) in records.iter().enumerate() {
            tick("events", i);
            let mut row = RowOutcome::default();
            row.absorb(self.graph.upsert_event(
                rec.id.as_str().into(),
                Event {
                    name: rec.name.clone(),
                    time: rec.time,
                    utc_offset: rec.utc_offset,
                },
            ));
            row.apply(self.graph.upsert_relationship(Relationship::HostedEvent {
                group: rec.group_id.as_str().into(),
                event: rec.id.as_str().into(),
            }));
            self.report.events.record(row);
        }
        info!(rows = records.len(), "loaded events stream");
    }

    /// Load the `rsvps` stream
    pub fn load_rsvps(&mut self, records: &[RsvpRecord]) {
        for (i, rec) in records.iter().enumerate() {
            tick("rsvps", i);
            let mut row = RowOutcome::default();
            row.apply(self.graph.upsert_relationship(Relationship::Rsvpd {
                member: rec.member_id.as_str().into(),
                rsvp: Rsvp {
                    id: rec.rsvp_id.clone(),
                    event: rec.event_id.as_str().into(),
                    created: rec.created,
                    last_modified: rec.mtime,
                    response: rec.response.as_str().into(),
                },
            }));
            self.report.rsvps.record(row);
        }
        info!(rows = records.len(), "loaded rsvps stream");
    }
}

fn tick(stream: &str, row: usize) {
    if row > 0 && row % CHUNK_ROWS == 0 {
        debug!(stream, row, "ingestion progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_record(id: &str, name: &str) -> GroupRecord {
        GroupRecord {
            id: id.into(),
            name: name.into(),
            urlname: name.to_lowercase(),
            rating: 4.0,
            link: String::new(),
            created: 0,
            organiser_member_id: None,
            organiser_name: None,
        }
    }

    fn rsvp_record(rsvp_id: &str, member: &str, event: &str, response: &str) -> RsvpRecord {
        RsvpRecord {
            rsvp_id: rsvp_id.into(),
            member_id: member.into(),
            event_id: event.into(),
            created: 1,
            mtime: 1,
            response: response.into(),
        }
    }

    #[test]
    fn test_dangling_rsvp_is_skipped_and_counted() {
        let mut graph = MeetupGraph::new();
        let mut loader = GraphLoader::new(&mut graph);
        loader.load_groups(&[group_record("g1", "Graphs")]);
        loader.load_members(&[MemberRecord {
            id: "m1".into(),
            name: "Ada".into(),
            group_id: None,
            joined: None,
            topics: None,
        }]);
        loader.load_events(&[EventRecord {
            id: "e1".into(),
            name: "Meetup".into(),
            time: 100,
            utc_offset: 0,
            group_id: "g1".into(),
        }]);
        // second rsvp cites an event that was never ingested
        loader.load_rsvps(&[
            rsvp_record("r1", "m1", "e1", "yes"),
            rsvp_record("r2", "m1", "no-such-event", "yes"),
        ]);

        let report = loader.finish();
        assert_eq!(report.rsvps.created, 1);
        assert_eq!(report.rsvps.skipped, 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(graph.rsvps_of(&"m1".into()).len(), 1);
    }

    #[test]
    fn test_replaying_a_batch_is_idempotent() {
        let groups = [group_record("g1", "Graphs")];
        let topics = [GroupTopicRecord {
            id: "t1".into(),
            name: "Neo4j".into(),
            urlkey: "neo4j".into(),
            group_id: "g1".into(),
        }];
        let members = [MemberRecord {
            id: "m1".into(),
            name: "Ada".into(),
            group_id: Some("g1".into()),
            joined: Some(100),
            topics: Some("t1".into()),
        }];

        let mut graph = MeetupGraph::new();
        for pass in 0..2 {
            let mut loader = GraphLoader::new(&mut graph);
            loader.load_groups(&groups);
            loader.load_group_topics(&topics);
            loader.load_members(&members);
            let report = loader.finish();
            if pass == 0 {
                assert_eq!(report.members.created, 1);
            } else {
                assert_eq!(report.members.matched, 1);
                assert_eq!(report.members.created, 0);
            }
        }

        assert_eq!(graph.member_count(), 1);
        assert_eq!(graph.memberships_of(&"m1".into()).len(), 1);
        assert_eq!(graph.interests_of(&"m1".into()).len(), 1);
        assert_eq!(graph.relationship_count(), 3);
    }

    #[test]
    fn test_organiser_rows_create_member_and_edge() {
        let mut graph = MeetupGraph::new();
        let mut loader = GraphLoader::new(&mut graph);
        loader.load_groups(&[GroupRecord {
            organiser_member_id: Some("m9".into()),
            organiser_name: Some("Grace".into()),
            ..group_record("g1", "Graphs")
        }]);
        let report = loader.finish();

        assert_eq!(report.groups.created, 1);
        assert_eq!(graph.organiser_of(&"g1".into()), Some(&"m9".into()));
        assert_eq!(graph.member(&"m9".into()).unwrap().name, "Grace");
    }

    #[test]
    fn test_report_display_lists_streams() {
        let report = IngestReport::default();
        let rendered = report.to_string();
        assert!(rendered.contains("groups_topics"));
        assert!(rendered.contains("skipped"));
    }
}
