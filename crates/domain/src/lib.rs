//! Domain layer for the studio site backend.
//!
//! This crate contains:
//! - Content models and their request DTOs
//! - The intake workflow and subscriber rules
//! - The theme provider state machine
//! - Store traits implemented by the persistence crate

pub mod models;
pub mod services;
pub mod store;
