// LogLens - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or touch the filesystem directly.

pub mod aggregate;
pub mod export;
pub mod history;
pub mod model;
pub mod parser;
pub mod upload;
