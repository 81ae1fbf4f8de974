//! Common types, traits, and error definitions for neural_replanning
//!
//! This module provides the configuration model and the collaborator
//! interfaces (validity checking, prediction, termination) that every
//! planning component is written against.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
