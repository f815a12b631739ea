//! Persistence layer for the studio site backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - `PgStore` and `MemoryStore`, the two implementations of the domain store traits
//! - The realtime listener for theme change notifications

pub mod db;
pub mod entities;
pub mod memory;
pub mod metrics;
pub mod pg_store;
pub mod realtime;
pub mod repositories;

pub use memory::MemoryStore;
pub use pg_store::PgStore;
pub use realtime::ThemeChangeListener;
