//! HTTP inbound adapter exposing the profile endpoints.

pub mod avatar;
pub mod error;
pub mod health;
pub mod profiles;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
