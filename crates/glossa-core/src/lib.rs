//! # glossa-core
//!
//! Core types, traits, configuration, and error handling for the Glossa gateway.

pub mod config;
pub mod error;
pub mod traits;
pub mod translation;
