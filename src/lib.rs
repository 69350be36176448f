//! TechVault client core
//!
//! Session handling, optimistic favorite/rating mutations and debounced
//! vault search for the TechVault knowledge base, behind a typed backend
//! gateway.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
