//! Utility modules for neural_replanning

pub mod path_io;
pub mod visualization;

pub use path_io::*;
pub use visualization::{colors, quick_plot_path, PathStyle, Visualizer};
