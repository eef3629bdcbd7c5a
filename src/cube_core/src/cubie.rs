//! The arena of cubies making up the puzzle.
//!
//! Cubies are plain records indexed by a stable [`CubieId`]. A cubie's world
//! pose is stored directly; turning a layer rewrites the poses of the cubies in
//! it rather than moving them between parent frames.

use cgmath::{InnerSpace, Matrix3, One, Quaternion, Rotation, Vector3};
use itertools::Itertools;
use log::trace;

use crate::{
    color::Color,
    error::CorruptStateError,
    geometry::{Axis, CUBIE_PITCH, Direction, LatticePos, snap},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubieId(pub usize);

/// One colored face of a cubie, tagged with the direction it faces in the
/// cubie's own frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Facelet {
    pub local: Direction,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct Cubie {
    id: CubieId,
    position: Vector3<f64>,
    orientation: Quaternion<f64>,
    facelets: Vec<Facelet>,
}

impl Cubie {
    #[must_use]
    pub fn id(&self) -> CubieId {
        self.id
    }

    /// World position in lattice units. Only meaningful as a slot after
    /// rounding; see [`Cubie::lattice_position`].
    #[must_use]
    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    #[must_use]
    pub fn orientation(&self) -> Quaternion<f64> {
        self.orientation
    }

    #[must_use]
    pub fn facelets(&self) -> &[Facelet] {
        &self.facelets
    }

    /// # Errors
    ///
    /// Fails if any coordinate is further than the lattice tolerance from an
    /// integer.
    pub fn lattice_position(&self) -> Result<LatticePos, CorruptStateError> {
        LatticePos::from_vector(self.position).ok_or(CorruptStateError::OffLattice {
            cubie: self.id,
            position: self.position.into(),
        })
    }

    /// World direction that the given facelet currently faces.
    #[must_use]
    pub fn facelet_direction(&self, facelet: &Facelet) -> Vector3<f64> {
        self.orientation.rotate_vector(facelet.local.vector())
    }

    pub(crate) fn set_pose(&mut self, position: Vector3<f64>, orientation: Quaternion<f64>) {
        self.position = position;
        self.orientation = orientation;
    }
}

/// A cubie's settled pose, comparable with `==`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CubieSnapshot {
    pub id: CubieId,
    pub position: LatticePos,
    /// Rows of the rotation matrix taking the cubie's frame to the world.
    pub orientation: [[i8; 3]; 3],
}

#[derive(Debug, Clone)]
pub struct CubieModel {
    cubies: Vec<Cubie>,
}

impl Default for CubieModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CubieModel {
    /// A solved cube.
    #[must_use]
    pub fn new() -> CubieModel {
        let mut model = CubieModel { cubies: Vec::new() };
        model.reset();
        model
    }

    /// Discards every cubie and rebuilds the solved cube. Each slot's outward
    /// faces are painted with the standard scheme.
    pub fn reset(&mut self) {
        self.cubies = LatticePos::all()
            .enumerate()
            .map(|(i, pos)| Cubie {
                id: CubieId(i),
                position: pos.to_vector(),
                orientation: Quaternion::one(),
                facelets: pos
                    .outward_directions()
                    .map(|local| Facelet {
                        local,
                        color: Color::for_direction(local),
                    })
                    .collect(),
            })
            .collect();

        trace!(target: "cubie_model", "Reset to {} solved cubies", self.cubies.len());
    }

    #[must_use]
    pub fn cubies(&self) -> &[Cubie] {
        &self.cubies
    }

    /// # Panics
    ///
    /// Panics if `id` does not come from this model.
    #[must_use]
    pub fn cubie(&self, id: CubieId) -> &Cubie {
        &self.cubies[id.0]
    }

    pub(crate) fn cubie_mut(&mut self, id: CubieId) -> &mut Cubie {
        &mut self.cubies[id.0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cubies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cubies.is_empty()
    }

    /// Where the cubie should be drawn, in render units.
    #[must_use]
    pub fn render_position(&self, id: CubieId) -> Vector3<f64> {
        self.cubie(id).position * CUBIE_PITCH
    }

    /// # Errors
    ///
    /// See [`Cubie::lattice_position`].
    pub fn lattice_position(&self, id: CubieId) -> Result<LatticePos, CorruptStateError> {
        self.cubie(id).lattice_position()
    }

    /// The cubies whose coordinate along `axis` is `value`.
    ///
    /// # Errors
    ///
    /// Fails loudly if any cubie's coordinate along `axis` is off the lattice
    /// instead of guessing which layer it belongs to.
    pub fn cubies_in_layer(
        &self,
        axis: Axis,
        value: i8,
    ) -> Result<Vec<CubieId>, CorruptStateError> {
        let mut layer = Vec::with_capacity(9);

        for cubie in &self.cubies {
            let coord = cubie.position[axis.index()];
            let Some(snapped) = snap(coord) else {
                return Err(CorruptStateError::OffLattice {
                    cubie: cubie.id,
                    position: cubie.position.into(),
                });
            };

            if snapped == value {
                layer.push(cubie.id);
            }
        }

        Ok(layer)
    }

    /// The cubie currently occupying `pos`, if the model is settled.
    #[must_use]
    pub fn cubie_at(&self, pos: LatticePos) -> Option<CubieId> {
        self.cubies
            .iter()
            .find(|cubie| cubie.lattice_position().ok() == Some(pos))
            .map(Cubie::id)
    }

    /// Settled poses of every cubie, in id order.
    ///
    /// # Errors
    ///
    /// Fails if any cubie is off the lattice or not rotated by whole quarter
    /// turns.
    pub fn snapshot(&self) -> Result<Vec<CubieSnapshot>, CorruptStateError> {
        self.cubies
            .iter()
            .map(|cubie| {
                Ok(CubieSnapshot {
                    id: cubie.id,
                    position: cubie.lattice_position()?,
                    orientation: axis_aligned_matrix(cubie.orientation).ok_or(
                        CorruptStateError::OrientationNotAxisAligned { cubie: cubie.id },
                    )?,
                })
            })
            .collect()
    }

    /// Checks that every slot holds exactly one settled cubie.
    ///
    /// # Errors
    ///
    /// Reports the first violation found.
    pub fn verify(&self) -> Result<(), CorruptStateError> {
        let snapshot = self.snapshot()?;

        let mut occupants = snapshot
            .iter()
            .map(|cubie| (cubie.position, cubie.id))
            .collect_vec();
        occupants.sort();

        for ((pos_a, first), (pos_b, second)) in occupants.iter().tuple_windows() {
            if pos_a == pos_b {
                return Err(CorruptStateError::PositionCollision {
                    first: *first,
                    second: *second,
                    position: pos_a.0,
                });
            }
        }

        for position in LatticePos::all() {
            if occupants.binary_search_by_key(&position, |(pos, _)| *pos).is_err() {
                return Err(CorruptStateError::MissingCubie {
                    position: position.0,
                });
            }
        }

        Ok(())
    }
}

/// The rotation matrix of `orientation` with every entry rounded to -1, 0 or 1,
/// or `None` if it is not a quarter-turn rotation.
#[must_use]
pub fn axis_aligned_matrix(orientation: Quaternion<f64>) -> Option<[[i8; 3]; 3]> {
    let m = Matrix3::from(orientation.normalize());

    let mut rows = [[0_i8; 3]; 3];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, entry) in row.iter_mut().enumerate() {
            // cgmath matrices are indexed column first
            *entry = snap(m[c][r])?;
        }
    }

    let is_signed_permutation = (0..3).all(|i| {
        let row_nonzero = rows[i].iter().filter(|v| **v != 0).count();
        let col_nonzero = rows.iter().filter(|row| row[i] != 0).count();
        row_nonzero == 1 && col_nonzero == 1 && rows[i].iter().all(|v| v.abs() <= 1)
    });

    if is_signed_permutation && determinant(&rows) == 1 {
        Some(rows)
    } else {
        None
    }
}

/// Replaces `orientation` with the exact quarter-turn rotation it is closest
/// to.
#[must_use]
pub fn snap_orientation(orientation: Quaternion<f64>) -> Option<Quaternion<f64>> {
    let rows = axis_aligned_matrix(orientation)?;
    let col = |c: usize| {
        Vector3::new(
            f64::from(rows[0][c]),
            f64::from(rows[1][c]),
            f64::from(rows[2][c]),
        )
    };

    Some(Quaternion::from(Matrix3::from_cols(col(0), col(1), col(2))).normalize())
}

fn determinant(m: &[[i8; 3]; 3]) -> i32 {
    let m = m.map(|row| row.map(i32::from));
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use cgmath::{Rad, Rotation3};

    use super::*;
    use crate::geometry::{CUBIE_GAP, CUBIE_SIZE};

    #[test]
    fn solved_model() {
        let model = CubieModel::new();
        assert_eq!(model.len(), 26);
        model.verify().unwrap();

        let facelet_count = model.cubies().iter().map(|c| c.facelets().len()).sum::<usize>();
        assert_eq!(facelet_count, 54);

        let corner = model.cubie_at(LatticePos::new(1, 1, 1)).unwrap();
        let colors = model
            .cubie(corner)
            .facelets()
            .iter()
            .map(|f| f.color)
            .collect_vec();
        assert_eq!(colors, [Color::Red, Color::White, Color::Green]);
    }

    #[test]
    fn render_positions_leave_a_gap() {
        let model = CubieModel::new();
        let corner = model.cubie_at(LatticePos::new(1, 1, 1)).unwrap();
        let edge = model.cubie_at(LatticePos::new(0, 1, 1)).unwrap();

        assert_eq!(
            model.render_position(corner),
            Vector3::new(CUBIE_PITCH, CUBIE_PITCH, CUBIE_PITCH)
        );

        let spacing = (model.render_position(corner) - model.render_position(edge)).magnitude();
        assert!((spacing - CUBIE_SIZE - CUBIE_GAP).abs() < 1e-12);
    }

    #[test]
    fn layers_have_nine_cubies() {
        let model = CubieModel::new();
        for axis in Axis::ALL {
            for value in [-1, 0, 1] {
                let layer = model.cubies_in_layer(axis, value).unwrap();
                assert_eq!(layer.len(), if value == 0 { 8 } else { 9 });
            }
        }
    }

    #[test]
    fn off_lattice_cubies_fail_loudly() {
        let mut model = CubieModel::new();
        let id = model.cubie_at(LatticePos::new(1, 1, 1)).unwrap();
        model
            .cubie_mut(id)
            .set_pose(Vector3::new(1.0, 0.5, 1.0), Quaternion::one());

        assert!(matches!(
            model.cubies_in_layer(Axis::Y, 1),
            Err(CorruptStateError::OffLattice { cubie, .. }) if cubie == id
        ));
        // Other axes are still readable
        assert_eq!(model.cubies_in_layer(Axis::X, 1).unwrap().len(), 9);
        assert!(model.verify().is_err());
    }

    #[test]
    fn collisions_are_detected() {
        let mut model = CubieModel::new();
        let a = model.cubie_at(LatticePos::new(1, 1, 1)).unwrap();
        model
            .cubie_mut(a)
            .set_pose(Vector3::new(1.0, 1.0, -1.0), Quaternion::one());

        assert!(matches!(
            model.verify(),
            Err(CorruptStateError::PositionCollision { .. })
        ));
    }

    #[test]
    fn reset_restores_cardinality_and_poses() {
        let mut model = CubieModel::new();
        let solved = model.snapshot().unwrap();
        let id = CubieId(3);
        model.cubie_mut(id).set_pose(
            Vector3::new(9.0, 9.0, 9.0),
            Quaternion::from_angle_x(Rad(0.3)),
        );
        model.reset();
        assert_eq!(model.snapshot().unwrap(), solved);
    }

    #[test]
    fn orientation_snapping() {
        assert_eq!(
            axis_aligned_matrix(Quaternion::one()),
            Some([[1, 0, 0], [0, 1, 0], [0, 0, 1]])
        );

        let quarter = Quaternion::from_angle_x(Rad(-FRAC_PI_2));
        // Y goes to -Z and Z goes to Y
        assert_eq!(
            axis_aligned_matrix(quarter),
            Some([[1, 0, 0], [0, 0, 1], [0, -1, 0]])
        );

        let wobbly = Quaternion::from_angle_y(Rad(FRAC_PI_2 + 0.01)) * quarter;
        let snapped = snap_orientation(wobbly).unwrap();
        assert_eq!(
            axis_aligned_matrix(snapped),
            axis_aligned_matrix(Quaternion::from_angle_y(Rad(FRAC_PI_2)) * quarter)
        );

        assert_eq!(axis_aligned_matrix(Quaternion::from_angle_z(Rad(0.7))), None);
    }
}
