//! Lattice coordinates and axis directions.
//!
//! X is left to right, Y is down to up, and Z is back to front. The coordinate
//! system is right-handed and one lattice unit is one cubie.

use std::fmt;

use cgmath::{InnerSpace, Vector3};

/// Edge length of a rendered cubie.
pub const CUBIE_SIZE: f64 = 1.0;
/// Gap between neighbouring rendered cubies.
pub const CUBIE_GAP: f64 = 0.05;
/// Distance between the centers of neighbouring cubies when rendered.
pub const CUBIE_PITCH: f64 = CUBIE_SIZE + CUBIE_GAP;

/// Largest distance, in lattice units, that a settled coordinate may be away
/// from an integer.
pub const LATTICE_EPSILON: f64 = 0.1;

/// Smallest dot product with a face axis for a direction to count as pointing
/// along it.
pub const CLASSIFY_THRESHOLD: f64 = 0.9;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

/// One of the six axis-aligned outward directions of the cube.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    #[must_use]
    pub fn new(axis: Axis, positive: bool) -> Direction {
        match (axis, positive) {
            (Axis::X, true) => Direction::PosX,
            (Axis::X, false) => Direction::NegX,
            (Axis::Y, true) => Direction::PosY,
            (Axis::Y, false) => Direction::NegY,
            (Axis::Z, true) => Direction::PosZ,
            (Axis::Z, false) => Direction::NegZ,
        }
    }

    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Direction::PosX | Direction::NegX => Axis::X,
            Direction::PosY | Direction::NegY => Axis::Y,
            Direction::PosZ | Direction::NegZ => Axis::Z,
        }
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(self, Direction::PosX | Direction::PosY | Direction::PosZ)
    }

    #[must_use]
    pub fn sign(self) -> i8 {
        if self.is_positive() { 1 } else { -1 }
    }

    #[must_use]
    pub fn vector(self) -> Vector3<f64> {
        self.axis().unit() * f64::from(self.sign())
    }

    /// The name of the world face this direction points out of.
    #[must_use]
    pub fn face_name(self) -> &'static str {
        match self {
            Direction::PosX => "right",
            Direction::NegX => "left",
            Direction::PosY => "top",
            Direction::NegY => "bottom",
            Direction::PosZ => "front",
            Direction::NegZ => "back",
        }
    }

    /// Classifies an arbitrary direction against the six face axes, returning
    /// `None` if no axis clears `threshold`.
    #[must_use]
    pub fn classify(v: Vector3<f64>, threshold: f64) -> Option<Direction> {
        let len = v.magnitude();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        let v = v / len;

        Direction::ALL
            .into_iter()
            .find(|dir| v.dot(dir.vector()) > threshold)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.face_name())
    }
}

/// Rounds `value` to the nearest integer if it is within [`LATTICE_EPSILON`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn snap(value: f64) -> Option<i8> {
    if !value.is_finite() {
        return None;
    }

    let rounded = value.round();
    if (value - rounded).abs() > LATTICE_EPSILON || rounded.abs() > f64::from(i8::MAX) {
        return None;
    }

    Some(rounded as i8)
}

/// A cubie's logical slot: an integer coordinate in {-1, 0, 1}³.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticePos(pub [i8; 3]);

impl LatticePos {
    #[must_use]
    pub fn new(x: i8, y: i8, z: i8) -> LatticePos {
        LatticePos([x, y, z])
    }

    #[must_use]
    pub fn x(self) -> i8 {
        self.0[0]
    }

    #[must_use]
    pub fn y(self) -> i8 {
        self.0[1]
    }

    #[must_use]
    pub fn z(self) -> i8 {
        self.0[2]
    }

    #[must_use]
    pub fn get(self, axis: Axis) -> i8 {
        self.0[axis.index()]
    }

    /// Every slot that holds a visible cubie, in a fixed order.
    pub fn all() -> impl Iterator<Item = LatticePos> {
        (-1..=1).flat_map(|x| {
            (-1..=1).flat_map(move |y| {
                (-1..=1)
                    .map(move |z| LatticePos::new(x, y, z))
                    .filter(|pos| *pos != LatticePos::new(0, 0, 0))
            })
        })
    }

    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(
            f64::from(self.x()),
            f64::from(self.y()),
            f64::from(self.z()),
        )
    }

    /// Rounds a world position back onto the lattice.
    #[must_use]
    pub fn from_vector(v: Vector3<f64>) -> Option<LatticePos> {
        Some(LatticePos([snap(v.x)?, snap(v.y)?, snap(v.z)?]))
    }

    /// The outward directions along which this slot touches the surface.
    pub fn outward_directions(self) -> impl Iterator<Item = Direction> {
        Axis::ALL.into_iter().filter_map(move |axis| match self.get(axis) {
            1 => Some(Direction::new(axis, true)),
            -1 => Some(Direction::new(axis, false)),
            _ => None,
        })
    }
}

impl fmt::Display for LatticePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}
