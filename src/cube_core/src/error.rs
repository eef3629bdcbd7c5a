use thiserror::Error;

use crate::{cubie::CubieId, notation::Move};

/// A token that is not a face letter optionally followed by `'` or `2`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid move: {token:?}")]
pub struct InvalidMoveError {
    pub token: String,
}

/// The cubie model stopped describing a legal cube. This is always a bug in the
/// rotation math or an illegal direct mutation of cubie state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorruptStateError {
    #[error("Facelet {facelet} of cubie {cubie:?} points along {direction:?}, which is not a face axis")]
    UnclassifiedFacelet {
        cubie: CubieId,
        facelet: usize,
        direction: [f64; 3],
    },
    #[error("Cubie {cubie:?} is at {position:?}, which is not within the lattice tolerance")]
    OffLattice { cubie: CubieId, position: [f64; 3] },
    #[error("Cubie {cubie:?} is not rotated by a multiple of a quarter turn")]
    OrientationNotAxisAligned { cubie: CubieId },
    #[error("Cubies {first:?} and {second:?} both occupy {position:?}")]
    PositionCollision {
        first: CubieId,
        second: CubieId,
        position: [i8; 3],
    },
    #[error("No cubie occupies {position:?}")]
    MissingCubie { position: [i8; 3] },
    #[error("Layer of {face} selected {found} cubies instead of 9")]
    LayerSize { face: char, found: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CubeError {
    #[error(transparent)]
    InvalidMove(#[from] InvalidMoveError),
    #[error(transparent)]
    CorruptState(#[from] CorruptStateError),
    #[error("Cannot start {requested} while {in_flight} is still rotating")]
    RotationInProgress { requested: String, in_flight: Move },
    #[error("Token {index} of the sequence is invalid: {source}")]
    SequenceToken {
        index: usize,
        #[source]
        source: InvalidMoveError,
    },
}
