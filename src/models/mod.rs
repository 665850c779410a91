pub mod health;
pub mod registration;
pub mod user;
