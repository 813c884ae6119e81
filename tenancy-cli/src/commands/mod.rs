//! Command implementations for the tenancy CLI

pub mod serve;

pub use serve::run_serve;
