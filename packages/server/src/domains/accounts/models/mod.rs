pub mod ngo_profile;
pub mod user;

pub use ngo_profile::{NgoContact, NgoProfile};
pub use user::{Principal, User};
