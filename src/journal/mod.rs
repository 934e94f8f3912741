//! Dream journal storage
//!
//! Dreams are analyzed once when saved and again whenever their transcript
//! is edited. Storage sits behind the `DreamRepository` trait so the store
//! can be handed an in-memory or persisted backing.

mod entry;
mod insights;
mod repository;
mod store;

pub use entry::{DreamEntry, DreamUpdate};
pub use insights::{most_common_dream_signs, JournalInsights, TOP_DREAM_SIGNS};
pub use repository::{DreamRepository, InMemoryRepository};
pub use store::DreamStore;
