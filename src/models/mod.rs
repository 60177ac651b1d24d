pub mod complaint;
pub mod user;
pub mod views;
