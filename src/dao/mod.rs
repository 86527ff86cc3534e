//! Session-store boundary: record models, the store trait, and the in-memory
//! backend.

/// In-memory session store backend.
pub mod memory;
/// Database record definitions.
pub mod models;
/// Storage abstraction the round engine writes through.
pub mod store;
