//! Storage abstractions for the service layer
//!
//! The record store is the only persistent state in the system: an ordered
//! map from record id to record, written out as a single JSON file.

pub mod record_store;
