//! NGOs domain - what a rescue organization sees around it

pub mod matcher;

pub use matcher::{rank_nearby, NgoMatcher, RankedCase, DEFAULT_RADIUS_KM};
