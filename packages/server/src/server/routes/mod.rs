// HTTP routes
pub mod adoptions;
pub mod cases;
pub mod health;
pub mod ngos;

pub use adoptions::*;
pub use cases::*;
pub use health::*;
pub use ngos::*;
