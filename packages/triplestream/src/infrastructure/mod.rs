//! Infrastructure layer - TripleSource adapters
//!
//! - `memory`: in-process statement set
//! - `sqlite`: SQLite statement table (feature `sqlite`)

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryTripleSource;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTripleSource;
