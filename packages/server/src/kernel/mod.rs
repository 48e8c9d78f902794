//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod store;

pub use deps::ServerDeps;
pub use store::{CaseStore, MemoryCaseStore, PostgresCaseStore, StoreError, StoreResult};
