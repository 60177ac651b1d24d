pub mod auth;
pub mod client;
pub mod fallback;
pub mod health;
pub mod operator;

#[cfg(test)]
pub mod test_utils;
