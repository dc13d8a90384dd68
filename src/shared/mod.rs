pub mod color;
pub mod geo;

pub use color::*;
pub use geo::*;
