//! Recommendation engines over the meetup graph
//!
//! Every engine is a pure read: it borrows the store, never mutates it, and
//! fails fast with `NotFound` when the query entity is absent.

mod collab;
mod similarity;
mod temporal;
mod types;

pub use collab::{
    similar_members, similar_members_scored, AffinityScorer, RecencyWeighted, SharedEventCount,
    DEFAULT_TOP_N,
};
pub use similarity::{recommend_groups, similar_groups, TopicWeights};
pub use temporal::{events_attended, next_groups};
pub use types::{
    AttendedEvent, GroupRecommendation, NextGroup, ScoredMember, SharedEvent, SimilarGroup,
    SimilarMember,
};
