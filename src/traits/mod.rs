//! Trait abstractions for dependency injection and testability.
//!
//! The engine is written against these collaborator contracts so it can
//! be unit tested without a real database or filesystem, and so storage
//! backends can be swapped without touching the lifecycle code.

pub mod assets;
pub mod store;
pub mod time;

// Re-export all traits for crate-internal use.
// The public API surface is controlled by lib.rs re-exports.
pub use assets::AssetStore;
pub use store::{ItemPatch, NewBid, NewHistory, NewItem, RecordStore, UpdateGuard};
pub use time::TimeProvider;

// Re-export default implementations
pub use time::SystemTimeProvider;
