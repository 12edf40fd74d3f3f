//! Core graph data structures

mod entity;
mod relationship;
mod store;

pub use entity::{EntityId, EntityLabel, Event, Group, Member, Topic};
pub use relationship::{Membership, RelKind, Relationship, Rsvp, RsvpResponse};
pub use store::{GraphError, GraphResult, GroupMember, MeetupGraph, Upsert};
