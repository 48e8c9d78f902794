//! Cases domain - reporting, claiming and resolving animal-welfare cases
//!
//! `lifecycle` owns every write; `policy` answers who may do what; `data`
//! converts between the wire and the typed models.

pub mod data;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod policy;

pub use errors::CaseError;
pub use lifecycle::{CaseLifecycle, DeleteScope};
pub use policy::CaseAccessPolicy;
