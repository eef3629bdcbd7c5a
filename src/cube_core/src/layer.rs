use std::f64::consts::FRAC_PI_2;

use cgmath::{Quaternion, Rad, Rotation3};

use crate::{
    cubie::{CubieId, CubieModel},
    error::CorruptStateError,
    geometry::Axis,
    notation::{Face, Move},
};

/// Where a face sits and which way its clockwise turn rotates about the world
/// axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FaceGeometry {
    pub axis: Axis,
    /// Coordinate of the face's layer along `axis`.
    pub layer: i8,
    /// Sign of the rotation about `+axis` for a clockwise quarter turn of this
    /// face. Clockwise is as seen looking at the face from outside.
    pub sign: i8,
}

impl Face {
    #[must_use]
    pub fn geometry(self) -> FaceGeometry {
        let (axis, layer, sign) = match self {
            Face::U => (Axis::Y, 1, -1),
            Face::D => (Axis::Y, -1, 1),
            Face::R => (Axis::X, 1, -1),
            Face::L => (Axis::X, -1, 1),
            Face::F => (Axis::Z, 1, -1),
            Face::B => (Axis::Z, -1, 1),
        };

        FaceGeometry { axis, layer, sign }
    }
}

impl Move {
    /// Signed angle about `+axis` in radians.
    #[must_use]
    pub fn angle(self) -> f64 {
        f64::from(self.face.geometry().sign * self.turns.amount()) * FRAC_PI_2
    }

    /// The rigid rotation of this move's layer.
    #[must_use]
    pub fn rotation(self) -> Quaternion<f64> {
        Quaternion::from_axis_angle(self.face.geometry().axis.unit(), Rad(self.angle()))
    }
}

/// The cubies that turn together for one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub mv: Move,
    pub cubies: Vec<CubieId>,
}

/// Picks the nine cubies in the layer turned by `mv`, based on where they
/// currently are.
///
/// # Errors
///
/// Fails if a cubie is off the lattice along the move's axis or the layer does
/// not hold exactly nine cubies.
pub fn select(model: &CubieModel, mv: Move) -> Result<Layer, CorruptStateError> {
    let geometry = mv.face.geometry();
    let cubies = model.cubies_in_layer(geometry.axis, geometry.layer)?;

    if cubies.len() != 9 {
        return Err(CorruptStateError::LayerSize {
            face: mv.face.letter(),
            found: cubies.len(),
        });
    }

    Ok(Layer { mv, cubies })
}
