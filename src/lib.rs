pub mod core;
pub mod handlers;
pub mod models;
pub mod services;
pub mod stores;
pub mod validation;
