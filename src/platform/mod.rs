// LogLens - platform/mod.rs
//
// Platform layer: config/data directories and durable storage.

pub mod config;
pub mod store;
