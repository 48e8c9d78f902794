pub mod case;
pub mod command;

pub use case::*;
pub use command::*;
