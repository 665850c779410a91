pub mod fallback;
pub mod health;
pub mod register;
pub mod users;
