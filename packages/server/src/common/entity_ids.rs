//! Typed ID definitions for the domain entities.
//!
//! The marker structs below are never constructed; they only tag `Id<T>`.

pub use super::id::Id;

/// Marker type for reported cases (incidents and adoption listings).
pub struct Case;

/// Marker type for user accounts (citizens and NGO staff).
pub struct User;

/// Marker type for NGO profiles.
pub struct NgoProfile;

/// Typed ID for cases.
pub type CaseId = Id<Case>;

/// Typed ID for user accounts.
pub type UserId = Id<User>;

/// Typed ID for NGO profiles.
pub type NgoProfileId = Id<NgoProfile>;
