// Workspace models used for validity checking

pub mod sphere_world;

pub use sphere_world::*;
