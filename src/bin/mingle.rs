//! Mingle CLI — load normalized meetup data and query recommendations.
//!
//! Usage:
//!   mingle load --groups groups.json [--topics ...] [--db path]
//!   mingle similar-groups <group> [--db path]
//!   mingle recommend <member> [--weight "Topic=5"] [--db path]

use clap::{Parser, Subcommand};
use mingle::ingest::{
    read_records, EventRecord, GraphLoader, GroupRecord, GroupTopicRecord, MemberRecord,
    RsvpRecord,
};
use mingle::{MeetupGraph, Recommender, SqliteStore, TopicWeights, DEFAULT_TOP_N};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mingle",
    version,
    about = "Graph-backed recommendation engine for community meetup data"
)]
struct Cli {
    /// Path to the SQLite snapshot file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest normalized record files and save the snapshot
    Load {
        /// JSON array of group records
        #[arg(long)]
        groups: Option<PathBuf>,
        /// JSON array of group-topic records
        #[arg(long)]
        topics: Option<PathBuf>,
        /// JSON array of member records
        #[arg(long)]
        members: Option<PathBuf>,
        /// JSON array of event records
        #[arg(long)]
        events: Option<PathBuf>,
        /// JSON array of rsvp records
        #[arg(long)]
        rsvps: Option<PathBuf>,
    },
    /// Groups sharing topics with a group
    SimilarGroups {
        /// Group id or unique group name
        group: String,
    },
    /// Groups matching a member's interests, excluding their memberships
    Recommend {
        /// Member id or unique member name
        member: String,
        /// Topic weight as NAME=SCORE (repeatable; unlisted topics weigh 1)
        #[arg(long = "weight")]
        weights: Vec<String>,
    },
    /// Events a member attended, in temporal order
    Events {
        /// Member id or unique member name
        member: String,
    },
    /// Members who attend the same events
    Peers {
        /// Member id or unique member name
        member: String,
        /// Maximum number of results
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Groups members join after a given group
    NextGroups {
        /// Group id or unique group name
        group: String,
    },
    /// Entity and relationship counts
    Stats,
}

/// Get the default snapshot path (~/.local/share/mingle/mingle.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let mingle_dir = data_dir.join("mingle");
    std::fs::create_dir_all(&mingle_dir).ok();
    mingle_dir.join("mingle.db")
}

fn open_store(db: Option<PathBuf>) -> Result<SqliteStore, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    SqliteStore::open(&db_path).map_err(|e| format!("Failed to open snapshot: {}", e))
}

fn load_graph(db: Option<PathBuf>) -> Result<MeetupGraph, String> {
    let store = open_store(db)?;
    store
        .load()
        .map_err(|e| format!("Failed to load snapshot: {}", e))
}

fn parse_weights(raw: &[String]) -> Result<TopicWeights, String> {
    let mut weights = TopicWeights::new();
    for entry in raw {
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| format!("invalid weight '{}', expected NAME=SCORE", entry))?;
        let score: f64 = value
            .parse()
            .map_err(|_| format!("invalid weight score '{}' in '{}'", value, entry))?;
        weights = weights.with(name, score);
    }
    Ok(weights)
}

fn read_into<T: serde::de::DeserializeOwned>(
    path: &Option<PathBuf>,
    stream: &str,
) -> Result<Vec<T>, String> {
    match path {
        Some(p) => read_records(p)
            .map_err(|e| format!("Failed to read {} from {}: {}", stream, p.display(), e)),
        None => Ok(Vec::new()),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_load(
    db: Option<PathBuf>,
    groups: &Option<PathBuf>,
    topics: &Option<PathBuf>,
    members: &Option<PathBuf>,
    events: &Option<PathBuf>,
    rsvps: &Option<PathBuf>,
) -> Result<i32, String> {
    let group_records: Vec<GroupRecord> = read_into(groups, "groups")?;
    let topic_records: Vec<GroupTopicRecord> = read_into(topics, "topics")?;
    let member_records: Vec<MemberRecord> = read_into(members, "members")?;
    let event_records: Vec<EventRecord> = read_into(events, "events")?;
    let rsvp_records: Vec<RsvpRecord> = read_into(rsvps, "rsvps")?;

    let store = open_store(db)?;
    let mut graph = store
        .load()
        .map_err(|e| format!("Failed to load snapshot: {}", e))?;

    let mut loader = GraphLoader::new(&mut graph);
    loader.load_groups(&group_records);
    loader.load_group_topics(&topic_records);
    loader.load_members(&member_records);
    loader.load_events(&event_records);
    loader.load_rsvps(&rsvp_records);
    let report = loader.finish();

    store
        .save(&graph)
        .map_err(|e| format!("Failed to save snapshot: {}", e))?;

    print!("{}", report);
    if report.skipped() > 0 {
        println!("{} row(s) skipped over dangling references", report.skipped());
    }
    Ok(0)
}

fn cmd_similar_groups(graph: &MeetupGraph, group: &str) -> Result<i32, String> {
    let api = Recommender::new(graph);
    let id = api.resolve_group(group).map_err(|e| e.to_string())?;
    let similar = api.similar_groups(&id).map_err(|e| e.to_string())?;
    if similar.is_empty() {
        println!("No groups share a topic with '{}'.", group);
        return Ok(0);
    }
    println!("{:<32} {:>7}  {}", "GROUP", "SHARED", "TOPICS");
    for s in similar {
        println!("{:<32} {:>7}  {}", s.name, s.shared_count, s.shared_topics.join(", "));
    }
    Ok(0)
}

fn cmd_recommend(graph: &MeetupGraph, member: &str, raw_weights: &[String]) -> Result<i32, String> {
    let weights = parse_weights(raw_weights)?;
    let api = Recommender::new(graph);
    let id = api.resolve_member(member).map_err(|e| e.to_string())?;
    let recs = api.recommend_groups(&id, &weights).map_err(|e| e.to_string())?;
    if recs.is_empty() {
        println!("No recommendations for '{}'.", member);
        return Ok(0);
    }
    println!("{:<32} {:>7}  {}", "GROUP", "SCORE", "MATCHED TOPICS");
    for r in recs {
        println!("{:<32} {:>7.1}  {}", r.name, r.score, r.matched_topics.join(", "));
    }
    Ok(0)
}

fn cmd_events(graph: &MeetupGraph, member: &str) -> Result<i32, String> {
    let api = Recommender::new(graph);
    let id = api.resolve_member(member).map_err(|e| e.to_string())?;
    let attended = api.events_attended(&id).map_err(|e| e.to_string())?;
    if attended.is_empty() {
        println!("'{}' has no attended events.", member);
        return Ok(0);
    }
    println!("{:<20} {:<40} {}", "WHEN", "EVENT", "GROUP");
    for e in attended {
        let when = e
            .local_time()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| e.effective_time.to_string());
        println!("{:<20} {:<40} {}", when, e.name, e.group_name);
    }
    Ok(0)
}

fn cmd_peers(graph: &MeetupGraph, member: &str, top: usize) -> Result<i32, String> {
    let api = Recommender::new(graph);
    let id = api.resolve_member(member).map_err(|e| e.to_string())?;
    let peers = api.similar_members(&id, top).map_err(|e| e.to_string())?;
    if peers.is_empty() {
        println!("'{}' shares no attended events with anyone.", member);
        return Ok(0);
    }
    println!("{:<32} {:>14}", "MEMBER", "SHARED EVENTS");
    for p in peers {
        println!("{:<32} {:>14}", p.name, p.shared_events);
    }
    Ok(0)
}

fn cmd_next_groups(graph: &MeetupGraph, group: &str) -> Result<i32, String> {
    let api = Recommender::new(graph);
    let id = api.resolve_group(group).map_err(|e| e.to_string())?;
    let next = api.next_groups(&id).map_err(|e| e.to_string())?;
    if next.is_empty() {
        println!("No member of '{}' joined another group afterwards.", group);
        return Ok(0);
    }
    println!("{:<32} {:>7}", "GROUP", "TIMES");
    for n in next {
        println!("{:<32} {:>7}", n.name, n.times);
    }
    Ok(0)
}

fn cmd_stats(graph: &MeetupGraph) -> Result<i32, String> {
    println!("{:<14} {:>8}", "ENTITY", "COUNT");
    println!("{:<14} {:>8}", "groups", graph.group_count());
    println!("{:<14} {:>8}", "topics", graph.topic_count());
    println!("{:<14} {:>8}", "members", graph.member_count());
    println!("{:<14} {:>8}", "events", graph.event_count());
    println!("{:<14} {:>8}", "edges", graph.relationship_count());
    Ok(0)
}

fn run(cli: Cli) -> Result<i32, String> {
    match &cli.command {
        Commands::Load {
            groups,
            topics,
            members,
            events,
            rsvps,
        } => cmd_load(cli.db.clone(), groups, topics, members, events, rsvps),
        Commands::SimilarGroups { group } => {
            cmd_similar_groups(&load_graph(cli.db.clone())?, group)
        }
        Commands::Recommend { member, weights } => {
            cmd_recommend(&load_graph(cli.db.clone())?, member, weights)
        }
        Commands::Events { member } => cmd_events(&load_graph(cli.db.clone())?, member),
        Commands::Peers { member, top } => cmd_peers(&load_graph(cli.db.clone())?, member, *top),
        Commands::NextGroups { group } => cmd_next_groups(&load_graph(cli.db.clone())?, group),
        Commands::Stats => cmd_stats(&load_graph(cli.db.clone())?),
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
