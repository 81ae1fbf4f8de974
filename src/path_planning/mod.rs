// Path Planning algorithms module

pub mod neural_replanner;

pub use neural_replanner::*;
