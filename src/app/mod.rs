// LogLens - app/mod.rs
//
// Application layer: wires file reading, the core pipeline, the ledger and
// the remote analysis service together.

pub mod analysis;
pub mod session;
