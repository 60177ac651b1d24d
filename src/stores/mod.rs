pub mod complaint_store;
pub mod database;
pub mod user_store;
