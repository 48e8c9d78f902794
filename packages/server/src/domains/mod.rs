// Business domains
pub mod accounts;
pub mod auth;
pub mod cases;
pub mod ngos;
