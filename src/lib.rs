pub mod classifier;
pub mod core;
pub mod handlers;
pub mod models;
pub mod security;
pub mod stores;
pub mod triage;
pub mod utils;
pub mod validation;
