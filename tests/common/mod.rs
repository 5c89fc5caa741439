//! Shared fixtures for integration and property tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod strategies;
