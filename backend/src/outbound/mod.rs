//! Outbound adapters implementing domain ports for document storage.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of the driven port traits:
//!
//! - **memory**: an in-process document store for users and recommendations
//! - **snapshot_file**: JSON snapshot persistence for the in-memory store
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

pub mod memory;
pub mod snapshot_file;
