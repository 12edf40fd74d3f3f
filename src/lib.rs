//! Mingle: Graph-Backed Meetup Recommendation Engine
//!
//! A recommendation engine over a heterogeneous entity graph of meetup
//! groups, topics, members, events, and attendance. Two strategies are
//! composed over the same store: content-based similarity (shared and
//! weighted topics) and collaborative filtering (co-attendance and
//! membership sequencing).
//!
//! # Core Concepts
//!
//! - **Entities**: groups, topics, members, and events keyed by stable
//!   external ids
//! - **Relationships**: typed directed edges with idempotent upsert
//!   semantics
//! - **Engines**: read-only traversals producing ranked result records
//!
//! # Example
//!
//! ```
//! use mingle::{Group, MeetupGraph, Recommender};
//!
//! let mut graph = MeetupGraph::new();
//! graph.upsert_group(
//!     "g1".into(),
//!     Group {
//!         name: "Graph Enthusiasts".into(),
//!         urlname: "graph-enthusiasts".into(),
//!         rating: 4.8,
//!         link: String::new(),
//!         created: 0,
//!     },
//! );
//! let recommender = Recommender::new(&graph);
//! assert!(recommender.similar_groups(&"g1".into()).unwrap().is_empty());
//! ```

mod api;
mod graph;
pub mod ingest;
pub mod recommend;
pub mod storage;

pub use api::Recommender;
pub use graph::{
    EntityId, EntityLabel, Event, GraphError, GraphResult, Group, GroupMember, Member,
    Membership, MeetupGraph, RelKind, Relationship, Rsvp, RsvpResponse, Topic, Upsert,
};
pub use recommend::{
    AffinityScorer, AttendedEvent, GroupRecommendation, NextGroup, RecencyWeighted, ScoredMember,
    SharedEvent, SharedEventCount, SimilarGroup, SimilarMember, TopicWeights, DEFAULT_TOP_N,
};
pub use storage::{SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
