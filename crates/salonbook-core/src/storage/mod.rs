//! Storage layer - SQLite
//!
//! Durable state for the booking flow: the single cart snapshot that
//! survives a reload, and the append-only booking history.
//!
//! The availability cache and all per-service loading/error maps are
//! transient by contract and have no tables here.

pub mod cart_store;
pub mod database;
pub mod history;
pub mod migrations;

pub use cart_store::CartStore;
pub use database::{default_database_path, Database, DatabaseConfig};
pub use history::BookingHistoryStore;
pub use migrations::{run_migrations, CURRENT_VERSION};
