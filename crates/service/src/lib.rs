//! Service layer: record storage and CRUD orchestration.
//! - `storage` owns the ordered, file-persisted record map.
//! - `services` implements create/read/update/delete semantics on top of it,
//!   including id generation, timestamp stamping, and merge-based updates.
//! - `clock` is the single time source, injectable for tests.

pub mod clock;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
