//! Auth domain - bearer token verification
//!
//! Registration, login and token issuance belong to the auth service.

pub mod jwt;

pub use jwt::{Claims, JwtService};
