//! MeetupGraph: the entity/relationship store and its upsert layer
//!
//! The store is an explicit, passed-in context object. Engines borrow it
//! read-only; ingestion holds the only `&mut`. Adjacency is indexed per
//! relationship type in both directions where traversals need it, so scoring
//! never scans the full entity set.

use super::entity::{EntityId, EntityLabel, Event, Group, Member, Topic};
use super::relationship::{Membership, RelKind, Relationship, Rsvp};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors surfaced by the store and the recommendation entry points
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{label} not found: {id}")]
    NotFound { label: EntityLabel, id: EntityId },

    #[error("dangling {relationship} reference: no {label} with id {id}")]
    DanglingReference {
        relationship: RelKind,
        label: EntityLabel,
        id: EntityId,
    },

    #[error("ambiguous {label} name '{name}': {count} entities match")]
    AmbiguousName {
        label: EntityLabel,
        name: String,
        count: usize,
    },
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Outcome of a create-if-absent upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The entity or edge did not exist and was created
    Created,
    /// An existing entity or edge was matched; supplied attributes were ignored
    Matched,
}

impl Upsert {
    pub fn created(&self) -> bool {
        matches!(self, Upsert::Created)
    }
}

/// Join record as seen from the group side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub member: EntityId,
    pub joined: i64,
}

/// The meetup entity graph
///
/// Entities live in per-label maps keyed by external id, with a name index
/// per label for display-name lookup. Relationships are stored as adjacency
/// lists per type; attendance (yes-rsvps) is additionally indexed both ways
/// for the collaborative filter.
#[derive(Debug, Default, Clone)]
pub struct MeetupGraph {
    groups: HashMap<EntityId, Group>,
    topics: HashMap<EntityId, Topic>,
    members: HashMap<EntityId, Member>,
    events: HashMap<EntityId, Event>,

    // name -> ids, per label (names are not unique)
    group_names: HashMap<String, Vec<EntityId>>,
    topic_names: HashMap<String, Vec<EntityId>>,
    member_names: HashMap<String, Vec<EntityId>>,
    event_names: HashMap<String, Vec<EntityId>>,

    // HAS_TOPIC
    group_topics: HashMap<EntityId, Vec<EntityId>>,
    topic_groups: HashMap<EntityId, Vec<EntityId>>,

    // MEMBER_OF
    memberships: HashMap<EntityId, Vec<Membership>>,
    group_members: HashMap<EntityId, Vec<GroupMember>>,

    // ORGANISES
    organiser_of_group: HashMap<EntityId, EntityId>,
    organises: HashMap<EntityId, Vec<EntityId>>,

    // HOSTED_EVENT
    group_events: HashMap<EntityId, Vec<EntityId>>,
    event_host: HashMap<EntityId, EntityId>,

    // RSVPD, full history per member plus attendance indexes (yes only, distinct)
    rsvps: HashMap<EntityId, Vec<Rsvp>>,
    rsvp_ids: HashSet<String>,
    attended: HashMap<EntityId, Vec<EntityId>>,
    attendees: HashMap<EntityId, Vec<EntityId>>,

    // INTERESTED_IN
    interests: HashMap<EntityId, Vec<EntityId>>,
}

impl MeetupGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // === Entity upserts (create-if-absent) ===

    /// Upsert a group; attributes apply only at first creation
    pub fn upsert_group(&mut self, id: EntityId, attrs: Group) -> Upsert {
        if self.groups.contains_key(&id) {
            return Upsert::Matched;
        }
        self.group_names
            .entry(attrs.name.clone())
            .or_default()
            .push(id.clone());
        self.groups.insert(id, attrs);
        Upsert::Created
    }

    /// Upsert a topic; attributes apply only at first creation
    pub fn upsert_topic(&mut self, id: EntityId, attrs: Topic) -> Upsert {
        if self.topics.contains_key(&id) {
            return Upsert::Matched;
        }
        self.topic_names
            .entry(attrs.name.clone())
            .or_default()
            .push(id.clone());
        self.topics.insert(id, attrs);
        Upsert::Created
    }

    /// Upsert a member; attributes apply only at first creation
    pub fn upsert_member(&mut self, id: EntityId, attrs: Member) -> Upsert {
        if self.members.contains_key(&id) {
            return Upsert::Matched;
        }
        self.member_names
            .entry(attrs.name.clone())
            .or_default()
            .push(id.clone());
        self.members.insert(id, attrs);
        Upsert::Created
    }

    /// Upsert an event; attributes apply only at first creation
    pub fn upsert_event(&mut self, id: EntityId, attrs: Event) -> Upsert {
        if self.events.contains_key(&id) {
            return Upsert::Matched;
        }
        self.event_names
            .entry(attrs.name.clone())
            .or_default()
            .push(id.clone());
        self.events.insert(id, attrs);
        Upsert::Created
    }

    // === Relationship upsert ===

    /// Upsert a relationship; both endpoints must already exist
    ///
    /// Re-applying the same edge matches instead of duplicating. RSVPD edges
    /// are keyed by rsvp id; all other kinds by their (source, target) pair.
    /// A missing endpoint fails with `DanglingReference` — callers decide
    /// whether to skip the row or abort the batch.
    pub fn upsert_relationship(&mut self, rel: Relationship) -> GraphResult<Upsert> {
        match rel {
            Relationship::HasTopic { group, topic } => {
                self.require_group(RelKind::HasTopic, &group)?;
                self.require_topic(RelKind::HasTopic, &topic)?;
                let out = self.group_topics.entry(group.clone()).or_default();
                if out.contains(&topic) {
                    return Ok(Upsert::Matched);
                }
                out.push(topic.clone());
                self.topic_groups.entry(topic).or_default().push(group);
                Ok(Upsert::Created)
            }
            Relationship::MemberOf {
                member,
                group,
                joined,
            } => {
                self.require_member(RelKind::MemberOf, &member)?;
                self.require_group(RelKind::MemberOf, &group)?;
                let out = self.memberships.entry(member.clone()).or_default();
                if out.iter().any(|m| m.group == group) {
                    return Ok(Upsert::Matched);
                }
                out.push(Membership {
                    group: group.clone(),
                    joined,
                });
                self.group_members
                    .entry(group)
                    .or_default()
                    .push(GroupMember { member, joined });
                Ok(Upsert::Created)
            }
            Relationship::Organises { member, group } => {
                self.require_member(RelKind::Organises, &member)?;
                self.require_group(RelKind::Organises, &group)?;
                // first recorded organiser wins
                if self.organiser_of_group.contains_key(&group) {
                    return Ok(Upsert::Matched);
                }
                self.organiser_of_group
                    .insert(group.clone(), member.clone());
                self.organises.entry(member).or_default().push(group);
                Ok(Upsert::Created)
            }
            Relationship::HostedEvent { group, event } => {
                self.require_group(RelKind::HostedEvent, &group)?;
                self.require_event(RelKind::HostedEvent, &event)?;
                // an event belongs to exactly one hosting group
                if self.event_host.contains_key(&event) {
                    return Ok(Upsert::Matched);
                }
                self.event_host.insert(event.clone(), group.clone());
                self.group_events.entry(group).or_default().push(event);
                Ok(Upsert::Created)
            }
            Relationship::Rsvpd { member, rsvp } => {
                self.require_member(RelKind::Rsvpd, &member)?;
                self.require_event(RelKind::Rsvpd, &rsvp.event)?;
                if self.rsvp_ids.contains(&rsvp.id) {
                    return Ok(Upsert::Matched);
                }
                self.rsvp_ids.insert(rsvp.id.clone());
                if rsvp.response.is_attendance() {
                    let events = self.attended.entry(member.clone()).or_default();
                    if !events.contains(&rsvp.event) {
                        events.push(rsvp.event.clone());
                        self.attendees
                            .entry(rsvp.event.clone())
                            .or_default()
                            .push(member.clone());
                    }
                }
                self.rsvps.entry(member).or_default().push(rsvp);
                Ok(Upsert::Created)
            }
            Relationship::InterestedIn { member, topic } => {
                self.require_member(RelKind::InterestedIn, &member)?;
                self.require_topic(RelKind::InterestedIn, &topic)?;
                let out = self.interests.entry(member).or_default();
                if out.contains(&topic) {
                    return Ok(Upsert::Matched);
                }
                out.push(topic);
                Ok(Upsert::Created)
            }
        }
    }

    // === Entity lookup ===

    pub fn group(&self, id: &EntityId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn topic(&self, id: &EntityId) -> Option<&Topic> {
        self.topics.get(id)
    }

    pub fn member(&self, id: &EntityId) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn event(&self, id: &EntityId) -> Option<&Event> {
        self.events.get(id)
    }

    /// Lookup a group by id, failing with `NotFound`
    pub fn require_group_entity(&self, id: &EntityId) -> GraphResult<&Group> {
        self.groups.get(id).ok_or_else(|| GraphError::NotFound {
            label: EntityLabel::Group,
            id: id.clone(),
        })
    }

    /// Lookup a member by id, failing with `NotFound`
    pub fn require_member_entity(&self, id: &EntityId) -> GraphResult<&Member> {
        self.members.get(id).ok_or_else(|| GraphError::NotFound {
            label: EntityLabel::Member,
            id: id.clone(),
        })
    }

    /// Resolve a group by display name
    ///
    /// Names are not unique; more than one match surfaces `AmbiguousName`
    /// rather than silently picking one.
    pub fn group_named(&self, name: &str) -> GraphResult<&EntityId> {
        Self::resolve_name(&self.group_names, EntityLabel::Group, name)
    }

    /// Resolve a member by display name (see `group_named`)
    pub fn member_named(&self, name: &str) -> GraphResult<&EntityId> {
        Self::resolve_name(&self.member_names, EntityLabel::Member, name)
    }

    /// Resolve a topic by display name (see `group_named`)
    pub fn topic_named(&self, name: &str) -> GraphResult<&EntityId> {
        Self::resolve_name(&self.topic_names, EntityLabel::Topic, name)
    }

    fn resolve_name<'a>(
        index: &'a HashMap<String, Vec<EntityId>>,
        label: EntityLabel,
        name: &str,
    ) -> GraphResult<&'a EntityId> {
        match index.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(GraphError::NotFound {
                label,
                id: EntityId::from(name),
            }),
            Some([id]) => Ok(id),
            Some(ids) => Err(GraphError::AmbiguousName {
                label,
                name: name.to_string(),
                count: ids.len(),
            }),
        }
    }

    // === Traversal accessors ===

    /// Topics tagged on a group
    pub fn topics_of(&self, group: &EntityId) -> &[EntityId] {
        self.group_topics.get(group).map_or(&[], Vec::as_slice)
    }

    /// Groups carrying a topic (the pivot for overlap scoring)
    pub fn groups_with_topic(&self, topic: &EntityId) -> &[EntityId] {
        self.topic_groups.get(topic).map_or(&[], Vec::as_slice)
    }

    /// A member's group affiliations with join timestamps
    pub fn memberships_of(&self, member: &EntityId) -> &[Membership] {
        self.memberships.get(member).map_or(&[], Vec::as_slice)
    }

    /// Whether the member currently belongs to the group
    pub fn is_member_of(&self, member: &EntityId, group: &EntityId) -> bool {
        self.memberships_of(member).iter().any(|m| &m.group == group)
    }

    /// Members of a group with their join timestamps
    pub fn members_of(&self, group: &EntityId) -> &[GroupMember] {
        self.group_members.get(group).map_or(&[], Vec::as_slice)
    }

    /// The recorded organiser of a group, if any
    pub fn organiser_of(&self, group: &EntityId) -> Option<&EntityId> {
        self.organiser_of_group.get(group)
    }

    /// Groups organised by a member
    pub fn organised_by(&self, member: &EntityId) -> &[EntityId] {
        self.organises.get(member).map_or(&[], Vec::as_slice)
    }

    /// Events hosted by a group
    pub fn events_of(&self, group: &EntityId) -> &[EntityId] {
        self.group_events.get(group).map_or(&[], Vec::as_slice)
    }

    /// The group hosting an event
    pub fn host_of(&self, event: &EntityId) -> Option<&EntityId> {
        self.event_host.get(event)
    }

    /// Full rsvp history of a member, in insertion order
    pub fn rsvps_of(&self, member: &EntityId) -> &[Rsvp] {
        self.rsvps.get(member).map_or(&[], Vec::as_slice)
    }

    /// Distinct events a member has a yes-rsvp for
    pub fn events_attended_by(&self, member: &EntityId) -> &[EntityId] {
        self.attended.get(member).map_or(&[], Vec::as_slice)
    }

    /// Distinct members with a yes-rsvp for an event
    pub fn attendees_of(&self, event: &EntityId) -> &[EntityId] {
        self.attendees.get(event).map_or(&[], Vec::as_slice)
    }

    /// Topics a member declared interest in
    pub fn interests_of(&self, member: &EntityId) -> &[EntityId] {
        self.interests.get(member).map_or(&[], Vec::as_slice)
    }

    // === Counts and iteration ===

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&EntityId, &Group)> {
        self.groups.iter()
    }

    pub fn topics(&self) -> impl Iterator<Item = (&EntityId, &Topic)> {
        self.topics.iter()
    }

    pub fn members(&self) -> impl Iterator<Item = (&EntityId, &Member)> {
        self.members.iter()
    }

    pub fn events(&self) -> impl Iterator<Item = (&EntityId, &Event)> {
        self.events.iter()
    }

    /// Total number of relationship edges across all kinds
    pub fn relationship_count(&self) -> usize {
        self.group_topics.values().map(Vec::len).sum::<usize>()
            + self.memberships.values().map(Vec::len).sum::<usize>()
            + self.organiser_of_group.len()
            + self.event_host.len()
            + self.rsvps.values().map(Vec::len).sum::<usize>()
            + self.interests.values().map(Vec::len).sum::<usize>()
    }

    /// Reconstruct every edge as a `Relationship` row (snapshot export)
    pub fn relationships(&self) -> impl Iterator<Item = Relationship> + '_ {
        let has_topic = self.group_topics.iter().flat_map(|(group, topics)| {
            topics.iter().map(move |topic| Relationship::HasTopic {
                group: group.clone(),
                topic: topic.clone(),
            })
        });
        let member_of = self.memberships.iter().flat_map(|(member, ships)| {
            ships.iter().map(move |m| Relationship::MemberOf {
                member: member.clone(),
                group: m.group.clone(),
                joined: m.joined,
            })
        });
        let organises = self
            .organiser_of_group
            .iter()
            .map(|(group, member)| Relationship::Organises {
                member: member.clone(),
                group: group.clone(),
            });
        let hosted = self
            .event_host
            .iter()
            .map(|(event, group)| Relationship::HostedEvent {
                group: group.clone(),
                event: event.clone(),
            });
        let rsvpd = self.rsvps.iter().flat_map(|(member, rsvps)| {
            rsvps.iter().map(move |r| Relationship::Rsvpd {
                member: member.clone(),
                rsvp: r.clone(),
            })
        });
        let interested = self.interests.iter().flat_map(|(member, topics)| {
            topics.iter().map(move |topic| Relationship::InterestedIn {
                member: member.clone(),
                topic: topic.clone(),
            })
        });

        has_topic
            .chain(member_of)
            .chain(organises)
            .chain(hosted)
            .chain(rsvpd)
            .chain(interested)
    }

    // === Endpoint checks ===

    fn require_group(&self, rel: RelKind, id: &EntityId) -> GraphResult<()> {
        if self.groups.contains_key(id) {
            Ok(())
        } else {
            Err(GraphError::DanglingReference {
                relationship: rel,
                label: EntityLabel::Group,
                id: id.clone(),
            })
        }
    }

    fn require_topic(&self, rel: RelKind, id: &EntityId) -> GraphResult<()> {
        if self.topics.contains_key(id) {
            Ok(())
        } else {
            Err(GraphError::DanglingReference {
                relationship: rel,
                label: EntityLabel::Topic,
                id: id.clone(),
            })
        }
    }

    fn require_member(&self, rel: RelKind, id: &EntityId) -> GraphResult<()> {
        if self.members.contains_key(id) {
            Ok(())
        } else {
            Err(GraphError::DanglingReference {
                relationship: rel,
                label: EntityLabel::Member,
                id: id.clone(),
            })
        }
    }

    fn require_event(&self, rel: RelKind, id: &EntityId) -> GraphResult<()> {
        if self.events.contains_key(id) {
            Ok(())
        } else {
            Err(GraphError::DanglingReference {
                relationship: rel,
                label: EntityLabel::Event,
                id: id.clone(),
            })
        }
    }
}
