//! Role-based access for authenticated callers
//!
//! Token verification happens in the HTTP middleware; this module only
//! answers "does this caller hold the role the route needs". Per-case
//! ownership and assignment rules live in `domains::cases::policy`.

mod actor;
mod errors;
mod role;

pub use actor::Actor;
pub use errors::AuthError;
pub use role::Role;
