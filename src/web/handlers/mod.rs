//! # Web API Request Handlers
//!
//! One module per endpoint group.

pub mod cache;
pub mod delegates;
pub mod health;
