pub mod bitstream;
pub mod error;
pub mod grid;

pub use bitstream::*;
pub use error::*;
pub use grid::*;
