// Animal Rescue - Case Core
//
// Citizens report animal-welfare cases; NGOs discover nearby cases, claim
// them exclusively and work them to resolution. The case lifecycle and NGO
// matching live under domains/; storage sits behind kernel::store::CaseStore.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
