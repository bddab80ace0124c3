//! Requirement document store
//!
//! Accumulates clarifications, categorized requirements and architecture
//! designs in one JSON document, keeps an append-only history of every
//! change, and exports timestamped JSON + Markdown copies on demand.

pub mod error;
pub mod file_ops;
pub mod markdown;
pub mod store;

pub use error::StoreError;
pub use store::RequirementStore;
