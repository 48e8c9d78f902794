pub mod input;
pub mod response;

pub use input::*;
pub use response::*;
