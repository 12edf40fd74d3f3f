//! Temporal sequencing: event ordering and next-group mining

use super::types::{AttendedEvent, NextGroup};
use crate::graph::{EntityId, GraphResult, MeetupGraph};
use std::collections::HashMap;

/// Events a member yes-rsvped, with hosting group, in effective-time order
///
/// Effective time is `time + utc_offset`; ties are broken by event id so the
/// ordering is deterministic.
pub fn events_attended(graph: &MeetupGraph, member: &EntityId) -> GraphResult<Vec<AttendedEvent>> {
    graph.require_member_entity(member)?;

    let mut results: Vec<AttendedEvent> = graph
        .events_attended_by(member)
        .iter()
        .filter_map(|event_id| {
            let event = graph.event(event_id)?;
            let host = graph.host_of(event_id)?;
            let group = graph.group(host)?;
            Some(AttendedEvent {
                event: event_id.clone(),
                name: event.name.clone(),
                effective_time: event.effective_time(),
                group_name: group.name.clone(),
            })
        })
        .collect();

    results.sort_by(|a, b| {
        a.effective_time
            .cmp(&b.effective_time)
            .then_with(|| a.event.cmp(&b.event))
    });
    Ok(results)
}

/// Groups members joined first after joining the reference group
///
/// For each member of the reference group, the single other membership with
/// the minimum join time strictly greater than the member's reference join
/// time is counted (ties at the same instant break by group id). Results are
/// ordered by count descending, ties by group name then id ascending.
pub fn next_groups(graph: &MeetupGraph, reference: &EntityId) -> GraphResult<Vec<NextGroup>> {
    graph.require_group_entity(reference)?;

    let mut counts: HashMap<&EntityId, usize> = HashMap::new();
    for gm in graph.members_of(reference) {
        let candidate = graph
            .memberships_of(&gm.member)
            .iter()
            .filter(|m| &m.group != reference && m.joined > gm.joined)
            .min_by(|a, b| a.joined.cmp(&b.joined).then_with(|| a.group.cmp(&b.group)));
        if let Some(next) = candidate {
            *counts.entry(&next.group).or_default() += 1;
        }
    }

    let mut results: Vec<NextGroup> = counts
        .into_iter()
        .filter_map(|(id, times)| {
            let group = graph.group(id)?;
            Some(NextGroup {
                group: id.clone(),
                name: group.name.clone(),
                times,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.times
            .cmp(&a.times)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.group.cmp(&b.group))
    });
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Event, Group, Member, Relationship, Rsvp};

    fn group(name: &str) -> Group {
        Group {
            name: name.into(),
            urlname: name.to_lowercase().replace(' ', "-"),
            rating: 4.0,
            link: String::new(),
            created: 0,
        }
    }

    fn yes_rsvp(id: &str, event: &str) -> Rsvp {
        Rsvp {
            id: id.into(),
            event: event.into(),
            created: 1,
            last_modified: 1,
            response: "yes".into(),
        }
    }

    #[test]
    fn test_events_ordered_by_effective_time() {
        let mut g = MeetupGraph::new();
        g.upsert_group("g1".into(), group("Graphs"));
        g.upsert_member("m1".into(), Member { name: "Ada".into() });
        g.upsert_event(
            "e1".into(),
            Event {
                name: "Later".into(),
                time: 1_000,
                utc_offset: 0,
            },
        );
        g.upsert_event(
            "e2".into(),
            Event {
                name: "Earlier".into(),
                time: 500,
                utc_offset: 0,
            },
        );
        for e in ["e1", "e2"] {
            g.upsert_relationship(Relationship::HostedEvent {
                group: "g1".into(),
                event: e.into(),
            })
            .unwrap();
        }
        g.upsert_relationship(Relationship::Rsvpd {
            member: "m1".into(),
            rsvp: yes_rsvp("r1", "e1"),
        })
        .unwrap();
        g.upsert_relationship(Relationship::Rsvpd {
            member: "m1".into(),
            rsvp: yes_rsvp("r2", "e2"),
        })
        .unwrap();

        let attended = events_attended(&g, &"m1".into()).unwrap();
        assert_eq!(attended.len(), 2);
        assert_eq!(attended[0].name, "Earlier");
        assert_eq!(attended[1].name, "Later");
        assert_eq!(attended[0].group_name, "Graphs");
    }

    #[test]
    fn test_utc_offset_shifts_ordering() {
        let mut g = MeetupGraph::new();
        g.upsert_group("g1".into(), group("Graphs"));
        g.upsert_member("m1".into(), Member { name: "Ada".into() });
        // e1 is scheduled earlier in UTC but lands later on the venue clock
        g.upsert_event(
            "e1".into(),
            Event {
                name: "Shifted".into(),
                time: 900,
                utc_offset: 7_200,
            },
        );
        g.upsert_event(
            "e2".into(),
            Event {
                name: "Plain".into(),
                time: 1_000,
                utc_offset: 0,
            },
        );
        for e in ["e1", "e2"] {
            g.upsert_relationship(Relationship::HostedEvent {
                group: "g1".into(),
                event: e.into(),
            })
            .unwrap();
        }
        g.upsert_relationship(Relationship::Rsvpd {
            member: "m1".into(),
            rsvp: yes_rsvp("r1", "e1"),
        })
        .unwrap();
        g.upsert_relationship(Relationship::Rsvpd {
            member: "m1".into(),
            rsvp: yes_rsvp("r2", "e2"),
        })
        .unwrap();

        let attended = events_attended(&g, &"m1".into()).unwrap();
        assert_eq!(attended[0].name, "Plain");
        assert_eq!(attended[1].name, "Shifted");
    }

    fn join(g: &mut MeetupGraph, member: &str, group_id: &str, joined: i64) {
        g.upsert_relationship(Relationship::MemberOf {
            member: member.into(),
            group: group_id.into(),
            joined,
        })
        .unwrap();
    }

    #[test]
    fn test_next_group_mining() {
        let mut g = MeetupGraph::new();
        for (id, name) in [("ref", "Reference"), ("gx", "Group X"), ("gy", "Group Y")] {
            g.upsert_group(id.into(), group(name));
        }
        for m in ["m1", "m2", "m3", "m4"] {
            g.upsert_member(m.into(), Member { name: m.to_uppercase() });
        }

        let t0 = 1_000;
        // three members join Reference then Group X
        for m in ["m1", "m2", "m3"] {
            join(&mut g, m, "ref", t0);
            join(&mut g, m, "gx", t0 + 10);
        }
        // a fourth joins Group Y sooner
        join(&mut g, "m4", "ref", t0);
        join(&mut g, "m4", "gy", t0 + 5);

        let next = next_groups(&g, &"ref".into()).unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!((next[0].group.as_str(), next[0].times), ("gx", 3));
        assert_eq!((next[1].group.as_str(), next[1].times), ("gy", 1));
    }

    #[test]
    fn test_next_group_only_counts_strictly_later_joins() {
        let mut g = MeetupGraph::new();
        for (id, name) in [("ref", "Reference"), ("ga", "Alpha")] {
            g.upsert_group(id.into(), group(name));
        }
        g.upsert_member("m1".into(), Member { name: "Ada".into() });
        // joined Alpha before (and at the same instant as) Reference
        join(&mut g, "m1", "ga", 900);
        join(&mut g, "m1", "ref", 1_000);

        assert!(next_groups(&g, &"ref".into()).unwrap().is_empty());
    }

    #[test]
    fn test_next_group_simultaneous_joins_break_by_id() {
        let mut g = MeetupGraph::new();
        for (id, name) in [("ref", "Reference"), ("g-a", "Alpha"), ("g-b", "Beta")] {
            g.upsert_group(id.into(), group(name));
        }
        g.upsert_member("m1".into(), Member { name: "Ada".into() });
        join(&mut g, "m1", "ref", 1_000);
        // both joined at the same later instant; lower group id wins
        join(&mut g, "m1", "g-b", 1_010);
        join(&mut g, "m1", "g-a", 1_010);

        let next = next_groups(&g, &"ref".into()).unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].group.as_str(), "g-a");
    }
}
