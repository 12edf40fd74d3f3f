//! Shared fixture dataset for integration tests
//!
//! A small but realistic community: three groups, four topics, five members
//! with staggered join times, three events, and an rsvp history that
//! includes a non-yes response and one dangling row.

use mingle::ingest::{
    EventRecord, GraphLoader, GroupRecord, GroupTopicRecord, IngestReport, MemberRecord,
    RsvpRecord,
};
use mingle::MeetupGraph;

pub fn group_records() -> Vec<GroupRecord> {
    let group = |id: &str, name: &str, organiser: Option<(&str, &str)>| GroupRecord {
        id: id.into(),
        name: name.into(),
        urlname: name.to_lowercase().replace(' ', "-"),
        rating: 4.5,
        link: format!("https://example.org/{id}"),
        created: 500,
        organiser_member_id: organiser.map(|(id, _)| id.into()),
        organiser_name: organiser.map(|(_, name)| name.into()),
    };
    vec![
        group("g-graph", "Graph Database Circle", Some(("m-alice", "Alice"))),
        group("g-ml", "Machine Intelligence Lab", None),
        group("g-rust", "Rust Systems Night", None),
    ]
}

pub fn topic_records() -> Vec<GroupTopicRecord> {
    let topic = |id: &str, name: &str, group: &str| GroupTopicRecord {
        id: id.into(),
        name: name.into(),
        urlkey: name.to_lowercase().replace(' ', "-"),
        group_id: group.into(),
    };
    vec![
        topic("t-neo4j", "Neo4j", "g-graph"),
        topic("t-dm", "Data Modelling", "g-graph"),
        topic("t-neo4j", "Neo4j", "g-ml"),
        topic("t-ml", "Machine Learning", "g-ml"),
        topic("t-rust", "Rust", "g-rust"),
    ]
}

pub fn member_records() -> Vec<MemberRecord> {
    let member = |id: &str, name: &str, group: Option<(&str, i64)>, topics: Option<&str>| {
        MemberRecord {
            id: id.into(),
            name: name.into(),
            group_id: group.map(|(g, _)| g.into()),
            joined: group.map(|(_, t)| t),
            topics: topics.map(Into::into),
        }
    };
    vec![
        member("m-alice", "Alice", Some(("g-graph", 1_000)), Some("t-neo4j;t-ml")),
        member("m-bob", "Bob", Some(("g-graph", 1_000)), None),
        member("m-bob", "Bob", Some(("g-ml", 1_200)), None),
        member("m-carol", "Carol", Some(("g-graph", 1_100)), None),
        member("m-carol", "Carol", Some(("g-ml", 1_300)), None),
        member("m-dave", "Dave", Some(("g-graph", 1_050)), None),
        member("m-dave", "Dave", Some(("g-rust", 1_075)), None),
        member("m-erin", "Erin", None, Some("t-ml")),
    ]
}

pub fn event_records() -> Vec<EventRecord> {
    let event = |id: &str, name: &str, time: i64, group: &str| EventRecord {
        id: id.into(),
        name: name.into(),
        time,
        utc_offset: 0,
        group_id: group.into(),
    };
    vec![
        event("e1", "Intro to Graph Modelling", 10_000, "g-graph"),
        event("e2", "Traversals in Practice", 20_000, "g-graph"),
        event("e3", "Learning on Graphs", 15_000, "g-ml"),
    ]
}

pub fn rsvp_records() -> Vec<RsvpRecord> {
    let rsvp = |id: &str, member: &str, event: &str, response: &str| RsvpRecord {
        rsvp_id: id.into(),
        member_id: member.into(),
        event_id: event.into(),
        created: 9_000,
        mtime: 9_000,
        response: response.into(),
    };
    vec![
        rsvp("r1", "m-alice", "e1", "yes"),
        rsvp("r2", "m-alice", "e2", "yes"),
        rsvp("r3", "m-bob", "e1", "yes"),
        rsvp("r4", "m-bob", "e2", "yes"),
        rsvp("r5", "m-bob", "e3", "yes"),
        rsvp("r6", "m-carol", "e2", "yes"),
        rsvp("r7", "m-erin", "e1", "no"),
        // dangling: this event was never ingested
        rsvp("r8", "m-carol", "e-missing", "yes"),
    ]
}

/// Ingest the full fixture into the given graph
pub fn load_fixture(graph: &mut MeetupGraph) -> IngestReport {
    let mut loader = GraphLoader::new(graph);
    loader.load_groups(&group_records());
    loader.load_group_topics(&topic_records());
    loader.load_members(&member_records());
    loader.load_events(&event_records());
    loader.load_rsvps(&rsvp_records());
    loader.finish()
}

/// Build a freshly-ingested fixture graph
pub fn fixture_graph() -> MeetupGraph {
    let mut graph = MeetupGraph::new();
    load_fixture(&mut graph);
    graph
}
