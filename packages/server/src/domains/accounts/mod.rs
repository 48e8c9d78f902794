//! Accounts domain - users and NGO profiles as read by the case core
//!
//! Accounts are created by the auth service; the case core only reads them.

pub mod models;

pub use models::{NgoContact, NgoProfile, Principal, User};
