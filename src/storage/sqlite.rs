//! SQLite snapshot store for the meetup graph

use crate::graph::{EntityLabel, MeetupGraph, RelKind, Relationship};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during snapshot operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

/// Result type for snapshot operations
pub type StorageResult<T> = Result<T, StorageError>;

/// SQLite-backed graph snapshot
///
/// One database file holds the whole graph: typed columns carry the
/// traversal keys, payloads live in JSON columns. Lookup indexes exist on
/// entity (label, id) and (label, name) and on relationship endpoints.
/// Thread-safe via an internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a snapshot database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory snapshot database (useful for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Entities table; (label, id) is the stable external key
            CREATE TABLE IF NOT EXISTS entities (
                label TEXT NOT NULL,
                id TEXT NOT NULL,
                name TEXT NOT NULL,
                attrs_json TEXT NOT NULL,
                PRIMARY KEY (label, id)
            );

            -- Display-name lookup (names are not unique)
            CREATE INDEX IF NOT EXISTS idx_entities_name
                ON entities(label, name);

            -- Relationships table; edge_key is the rsvp id for RSVPD rows,
            -- empty for every other kind
            CREATE TABLE IF NOT EXISTS relationships (
                kind TEXT NOT NULL,
                source_id TEXT NOT NULL,
                target_id TEXT NOT NULL,
                edge_key TEXT NOT NULL DEFAULT '',
                payload_json TEXT NOT NULL,
                PRIMARY KEY (kind, source_id, target_id, edge_key)
            );

            CREATE INDEX IF NOT EXISTS idx_relationships_source
                ON relationships(kind, source_id);
            CREATE INDEX IF NOT EXISTS idx_relationships_target
                ON relationships(kind, target_id);

            -- Enable WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    /// Persist a full graph snapshot, replacing any previous one
    ///
    /// Runs in a single transaction so readers never observe a half-written
    /// snapshot.
    pub fn save(&self, graph: &MeetupGraph) -> StorageResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM relationships", [])?;
        tx.execute("DELETE FROM entities", [])?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO entities (label, id, name, attrs_json) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (id, group) in graph.groups() {
                insert.execute(params![
                    EntityLabel::Group.as_str(),
                    id.as_str(),
                    group.name,
                    serde_json::to_string(group)?,
                ])?;
            }
            for (id, topic) in graph.topics() {
                insert.execute(params![
                    EntityLabel::Topic.as_str(),
                    id.as_str(),
                    topic.name,
                    serde_json::to_string(topic)?,
                ])?;
            }
            for (id, member) in graph.members() {
                insert.execute(params![
                    EntityLabel::Member.as_str(),
                    id.as_str(),
                    member.name,
                    serde_json::to_string(member)?,
                ])?;
            }
            for (id, event) in graph.events() {
                insert.execute(params![
                    EntityLabel::Event.as_str(),
                    id.as_str(),
                    event.name,
                    serde_json::to_string(event)?,
                ])?;
            }

            let mut insert_rel = tx.prepare(
                "INSERT INTO relationships (kind, source_id, target_id, edge_key, payload_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for rel in graph.relationships() {
                let edge_key = match &rel {
                    Relationship::Rsvpd { rsvp, .. } => rsvp.id.as_str(),
                    _ => "",
                };
                insert_rel.execute(params![
                    rel.kind().as_str(),
                    rel.source().as_str(),
                    rel.target().as_str(),
                    edge_key,
                    serde_json::to_string(&rel)?,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Load the snapshot back into a fresh graph
    ///
    /// Entities are restored before relationships, so a well-formed snapshot
    /// never dangles; a dangling row means the file was tampered with and
    /// surfaces as `Inconsistent`.
    pub fn load(&self) -> StorageResult<MeetupGraph> {
        let conn = self.conn.lock().unwrap();
        let mut graph = MeetupGraph::new();

        let mut stmt = conn.prepare("SELECT label, id, attrs_json FROM entities")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (label, id, attrs_json) = row?;
            let label: EntityLabel = label
                .parse()
                .map_err(StorageError::Inconsistent)?;
            match label {
                EntityLabel::Group => {
                    graph.upsert_group(id.into(), serde_json::from_str(&attrs_json)?);
                }
                EntityLabel::Topic => {
                    graph.upsert_topic(id.into(), serde_json::from_str(&attrs_json)?);
                }
                EntityLabel::Member => {
                    graph.upsert_member(id.into(), serde_json::from_str(&attrs_json)?);
                }
                EntityLabel::Event => {
                    graph.upsert_event(id.into(), serde_json::from_str(&attrs_json)?);
                }
            }
        }

        let mut stmt = conn.prepare("SELECT payload_json FROM relationships")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for row in rows {
            let rel: Relationship = serde_json::from_str(&row?)?;
            graph
                .upsert_relationship(rel)
                .map_err(|err| StorageError::Inconsistent(err.to_string()))?;
        }

        Ok(graph)
    }

    /// Number of stored relationship rows of one kind
    pub fn relationship_rows(&self, kind: RelKind) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM relationships WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
