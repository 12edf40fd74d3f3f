//! Ingestion boundary: normalized records and the batch loader
//!
//! Upstream acquisition and raw-JSON transformation live outside this crate;
//! what arrives here is one normalized record stream per entity and
//! relationship type.

mod loader;
mod records;

pub use loader::{read_records, GraphLoader, IngestError, IngestReport, LoadStats};
pub use records::{EventRecord, GroupRecord, GroupTopicRecord, MemberRecord, RsvpRecord};
