//! Identity persistence and session resolution.
//!
//! - [`IdentityStore`] - the durable single-value slot holding the identity token
//! - [`SessionManager`] - the in-memory view of that slot for one activation
//!
//! The store's operations never fail from the caller's point of view: an
//! unavailable medium reads as "no identity" and writes degrade to no-ops,
//! with the underlying error logged.

mod manager;
mod store;

pub use manager::SessionManager;
pub use store::{
    DetachedIdentityStore, FileIdentityStore, IDENTITY_SLOT_FILE, IdentityStore,
    MemoryIdentityStore,
};
