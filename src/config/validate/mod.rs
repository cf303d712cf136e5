//! Configuration validation
//!
//! Validates tuning specifications before any training starts.

mod error;
mod validator;

#[cfg(test)]
mod tests;

pub use error::ValidationError;
pub use validator::validate_config;
