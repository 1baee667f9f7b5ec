// LogLens - lib.rs
//
// Library entry point, exposing all modules for integration testing and
// programmatic use by view layers.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
