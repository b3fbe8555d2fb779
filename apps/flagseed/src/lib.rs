//! # Flagseed Library
//!
//! This library exposes the flagseed modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod client;
pub mod error;
pub mod seeder;

pub use error::SeedError;

// Re-export flagseed_core for convenience
pub use flagseed_core;
