//! Storage layer for the pick'em engine
//!
//! A thin abstraction over the SQLite database:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Reads, upserts and the award transition

pub mod models;
pub mod queries;
pub mod schema;

#[cfg(test)]
mod tests;

// Re-export the main types and database struct for easy access
pub use models::*;
pub use schema::PickDatabase;
