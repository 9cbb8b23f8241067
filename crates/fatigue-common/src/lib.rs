//! Fatigue Common - shared types for delegate fatigue analysis
//!
//! This crate provides the input side of the behavioral engine:
//! - Proposals, votes and the validated per-space proposal set
//! - Inclusive trailing windows and day arithmetic
//! - Engine configuration
//! - Error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod model;

pub use config::*;
pub use error::*;
pub use model::*;
