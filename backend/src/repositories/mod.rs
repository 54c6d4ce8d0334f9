//! Data access layer abstractions and implementations.
//!
//! The credential store trait is the only seam through which the service
//! touches persistent state; concrete backends live alongside it.

pub mod credential_store;
pub mod memory_store;
pub mod sqlite_store;
