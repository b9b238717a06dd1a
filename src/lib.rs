pub mod error;
pub mod footprint;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{Result, SkylineError};
