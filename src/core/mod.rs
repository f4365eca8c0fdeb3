// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod random;
pub mod state;

pub use error::{QuantumError, Result};
pub use state::AmplitudeVector;

pub mod constants;
pub use constants::qfuse_constants::*; // Re-export
