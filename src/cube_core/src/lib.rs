#![warn(clippy::pedantic)]
#![allow(clippy::float_cmp)]

//! A 3×3×3 cube as 26 rigid cubies with world poses, turned one layer at a
//! time.

pub mod color;
pub mod cubie;
pub mod error;
pub mod external;
pub mod geometry;
pub mod layer;
pub mod method;
pub mod notation;
mod puzzle;
pub mod report;
pub mod rotation;
pub mod sequence;

pub use color::Color;
pub use cubie::{CubieId, CubieModel};
pub use error::{CorruptStateError, CubeError, InvalidMoveError};
pub use geometry::{Direction, LatticePos};
pub use notation::{Face, Move, Turns};
pub use puzzle::Puzzle;
pub use report::FaceletReport;
pub use rotation::{RotationEngine, RotationStatus};
pub use sequence::{MoveTarget, SequencePlayer};
