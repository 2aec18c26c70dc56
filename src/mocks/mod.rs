//! Mock collaborators for testing.
//!
//! `MemoryStore` is a full, shared-state [`RecordStore`] implementation
//! whose conditional update is genuinely atomic, so engine concurrency
//! properties can be exercised without a real database. `MockTime`
//! drives the clock deterministically; `MemoryAssets` keeps uploads in
//! memory.

pub mod assets;
pub mod store;
pub mod time;

pub use assets::MemoryAssets;
pub use store::{MemoryStore, MemoryStoreFailure};
pub use time::MockTime;
