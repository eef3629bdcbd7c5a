//! Turning one layer, either instantly or animated over several ticks.
//!
//! The engine is a two-state machine. [`RotationEngine::begin`] captures the
//! poses of the layer's cubies under a pivot at the origin and moves to the
//! rotating state; every [`RotationEngine::tick`] then advances the pivot along
//! a slerp from the identity to the move's rotation. Once the animation reaches
//! its end every cubie of the layer is written back in world space at the exact
//! target, snapped onto the lattice. The snapped poses are computed and checked
//! in `begin`, so a layer that would not land on the lattice never starts
//! turning. Snapping happens after every move, animated or not.

use std::time::Duration;

use cgmath::{One, Quaternion, Rotation, Vector3};
use log::{debug, trace};

use crate::{
    cubie::{CubieId, CubieModel, snap_orientation},
    error::{CorruptStateError, CubeError},
    geometry::LatticePos,
    layer::{self, Layer},
    notation::Move,
};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RotationStatus {
    /// Nothing is rotating.
    Idle,
    /// A layer is part way through its turn; `progress` is in `[0, 1)`.
    InProgress { mv: Move, progress: f64 },
    /// The layer finished turning during this call and the model is settled.
    Completed(Move),
}

impl RotationStatus {
    #[must_use]
    pub fn is_in_progress(self) -> bool {
        matches!(self, RotationStatus::InProgress { .. })
    }
}

#[derive(Debug, Clone)]
struct CapturedPose {
    id: CubieId,
    position: Vector3<f64>,
    orientation: Quaternion<f64>,
}

#[derive(Debug, Clone)]
struct ActiveRotation {
    mv: Move,
    captured: Vec<CapturedPose>,
    /// Where each captured cubie ends up, already snapped.
    settled: Vec<CapturedPose>,
    target: Quaternion<f64>,
    duration: Duration,
    elapsed: Duration,
}

impl ActiveRotation {
    fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f64() / self.duration.as_secs_f64()
        }
    }

    /// Writes the captured poses rotated by `pivot` into the model.
    fn pose_under(&self, model: &mut CubieModel, pivot: Quaternion<f64>) {
        for pose in &self.captured {
            model.cubie_mut(pose.id).set_pose(
                pivot.rotate_vector(pose.position),
                pivot * pose.orientation,
            );
        }
    }

    /// Re-parents the layer into the cube at its snapped final poses.
    fn settle(&self, model: &mut CubieModel) {
        for pose in &self.settled {
            model
                .cubie_mut(pose.id)
                .set_pose(pose.position, pose.orientation);
        }
    }
}

/// Rotates every captured pose by `target` and rounds it onto the lattice.
fn settled_poses(
    captured: &[CapturedPose],
    target: Quaternion<f64>,
) -> Result<Vec<CapturedPose>, CorruptStateError> {
    captured
        .iter()
        .map(|pose| {
            let position = target.rotate_vector(pose.position);
            let lattice =
                LatticePos::from_vector(position).ok_or(CorruptStateError::OffLattice {
                    cubie: pose.id,
                    position: position.into(),
                })?;
            let orientation = snap_orientation(target * pose.orientation)
                .ok_or(CorruptStateError::OrientationNotAxisAligned { cubie: pose.id })?;

            Ok(CapturedPose {
                id: pose.id,
                position: lattice.to_vector(),
                orientation,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
enum EngineState {
    #[default]
    Idle,
    Rotating(ActiveRotation),
}

/// Drives layer rotations on a [`CubieModel`]. Only one rotation can be in
/// flight; the engine does not queue.
#[derive(Debug, Clone, Default)]
pub struct RotationEngine {
    state: EngineState,
}

impl RotationEngine {
    #[must_use]
    pub fn new() -> RotationEngine {
        RotationEngine::default()
    }

    #[must_use]
    pub fn is_rotating(&self) -> bool {
        matches!(self.state, EngineState::Rotating(_))
    }

    /// The move currently rotating, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<Move> {
        match &self.state {
            EngineState::Idle => None,
            EngineState::Rotating(active) => Some(active.mv),
        }
    }

    /// Starts turning the layer of `mv`. A zero `duration` completes the move
    /// before returning.
    ///
    /// # Errors
    ///
    /// Rejects the move without touching the model if another rotation is in
    /// flight, the layer cannot be selected, or the turned layer would not land
    /// on the lattice.
    pub fn begin(
        &mut self,
        model: &mut CubieModel,
        mv: Move,
        duration: Duration,
    ) -> Result<RotationStatus, CubeError> {
        if let Some(in_flight) = self.in_flight() {
            return Err(CubeError::RotationInProgress {
                requested: mv.to_string(),
                in_flight,
            });
        }

        let Layer { cubies, .. } = layer::select(model, mv)?;

        let captured = cubies
            .into_iter()
            .map(|id| {
                let cubie = model.cubie(id);
                CapturedPose {
                    id,
                    position: cubie.position(),
                    orientation: cubie.orientation(),
                }
            })
            .collect::<Vec<_>>();

        let target = mv.rotation();
        let settled = settled_poses(&captured, target)?;

        debug!(
            target: "rotation",
            "Begin {mv}: axis={:?} angle={:.3} duration={duration:?}",
            mv.face.geometry().axis,
            mv.angle(),
        );

        self.state = EngineState::Rotating(ActiveRotation {
            mv,
            captured,
            settled,
            target,
            duration,
            elapsed: Duration::ZERO,
        });

        Ok(self.tick(model, Duration::ZERO))
    }

    /// Advances the in-flight rotation by `elapsed`.
    pub fn tick(&mut self, model: &mut CubieModel, elapsed: Duration) -> RotationStatus {
        let EngineState::Rotating(active) = &mut self.state else {
            return RotationStatus::Idle;
        };

        active.elapsed = active.elapsed.saturating_add(elapsed);
        let t = active.progress();

        if t < 1.0 {
            let pivot = Quaternion::one().slerp(active.target, t);
            active.pose_under(model, pivot);
            trace!(target: "rotation", "{}: t={t:.3}", active.mv);
            return RotationStatus::InProgress {
                mv: active.mv,
                progress: t,
            };
        }

        let mv = active.mv;
        active.settle(model);
        self.state = EngineState::Idle;

        debug!(target: "rotation", "Completed {mv}");
        RotationStatus::Completed(mv)
    }

    /// Turns a layer with no animation.
    ///
    /// # Errors
    ///
    /// See [`RotationEngine::begin`].
    pub fn apply(&mut self, model: &mut CubieModel, mv: Move) -> Result<(), CubeError> {
        let status = self.begin(model, mv, Duration::ZERO)?;
        debug_assert_eq!(status, RotationStatus::Completed(mv));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use cgmath::{InnerSpace, Rotation3};

    use super::*;
    use crate::{
        color::Color,
        geometry::{CLASSIFY_THRESHOLD, Direction, LatticePos},
        notation::{Face, Turns, parse_sequence},
    };

    fn mv(token: &str) -> Move {
        Move::parse(token).unwrap()
    }

    #[test_log::test]
    fn r_moves_the_top_front_right_corner_to_the_back() {
        let mut model = CubieModel::new();
        let corner = model.cubie_at(LatticePos::new(1, 1, 1)).unwrap();

        RotationEngine::new().apply(&mut model, mv("R")).unwrap();

        assert_eq!(
            model.lattice_position(corner).unwrap(),
            LatticePos::new(1, 1, -1)
        );

        let cubie = model.cubie(corner);
        let top = cubie
            .facelets()
            .iter()
            .find(|f| {
                Direction::classify(cubie.facelet_direction(f), CLASSIFY_THRESHOLD)
                    == Some(Direction::PosY)
            })
            .unwrap();
        assert_eq!(top.color, Color::Green);
    }

    #[test_log::test]
    fn inverse_restores_every_cubie() {
        let solved = CubieModel::new().snapshot().unwrap();
        let mut engine = RotationEngine::new();

        for face in Face::ALL {
            for turns in [Turns::Clockwise, Turns::CounterClockwise, Turns::Half] {
                let mut model = CubieModel::new();
                // Start from a scrambled state so orientations are not trivial
                for m in parse_sequence("R U F' L2 D B").unwrap() {
                    engine.apply(&mut model, m).unwrap();
                }
                let before = model.snapshot().unwrap();

                let m = Move::new(face, turns);
                engine.apply(&mut model, m).unwrap();
                assert_ne!(model.snapshot().unwrap(), before, "{m} did nothing");
                engine.apply(&mut model, m.inverse()).unwrap();
                assert_eq!(model.snapshot().unwrap(), before, "{m} then {}", m.inverse());
            }
        }

        let mut model = CubieModel::new();
        engine.apply(&mut model, mv("F")).unwrap();
        engine.apply(&mut model, mv("F'")).unwrap();
        assert_eq!(model.snapshot().unwrap(), solved);
    }

    #[test]
    fn four_quarter_turns_are_the_identity() {
        let mut engine = RotationEngine::new();
        for face in Face::ALL {
            for turns in [Turns::Clockwise, Turns::CounterClockwise] {
                let mut model = CubieModel::new();
                engine.apply(&mut model, mv("D'")).unwrap();
                engine.apply(&mut model, mv("B2")).unwrap();
                let before = model.snapshot().unwrap();

                for _ in 0..4 {
                    engine.apply(&mut model, Move::new(face, turns)).unwrap();
                }
                assert_eq!(model.snapshot().unwrap(), before);
            }

            let mut model = CubieModel::new();
            let before = model.snapshot().unwrap();
            engine.apply(&mut model, Move::new(face, Turns::Half)).unwrap();
            engine.apply(&mut model, Move::new(face, Turns::Half)).unwrap();
            assert_eq!(model.snapshot().unwrap(), before);
        }
    }

    #[test_log::test]
    fn animation_runs_at_constant_angular_velocity() {
        let mut model = CubieModel::new();
        let mut engine = RotationEngine::new();
        let edge = model.cubie_at(LatticePos::new(1, 0, 1)).unwrap();

        let status = engine
            .begin(&mut model, mv("R"), Duration::from_millis(400))
            .unwrap();
        assert_eq!(
            status,
            RotationStatus::InProgress {
                mv: mv("R"),
                progress: 0.0
            }
        );
        assert!(engine.is_rotating());

        let status = engine.tick(&mut model, Duration::from_millis(200));
        let RotationStatus::InProgress { progress, .. } = status else {
            panic!("expected the rotation to be half done, got {status:?}");
        };
        assert!((progress - 0.5).abs() < 1e-9);

        // Halfway through R the front-right edge sits between the front and top
        let halfway = model.cubie(edge).position();
        let expected = Vector3::new(1.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2);
        assert!((halfway - expected).magnitude() < 1e-9, "{halfway:?}");
        assert_eq!(model.cubie_at(LatticePos::new(1, 0, 1)), None);

        let status = engine.tick(&mut model, Duration::from_millis(250));
        assert_eq!(status, RotationStatus::Completed(mv("R")));
        assert!(!engine.is_rotating());
        assert_eq!(
            model.lattice_position(edge).unwrap(),
            LatticePos::new(1, 1, 0)
        );
        assert_eq!(
            engine.tick(&mut model, Duration::from_millis(16)),
            RotationStatus::Idle
        );

        let mut instant = CubieModel::new();
        engine.apply(&mut instant, mv("R")).unwrap();
        assert_eq!(instant.snapshot().unwrap(), model.snapshot().unwrap());
    }

    #[test]
    fn settled_poses_are_exact() {
        let mut model = CubieModel::new();
        let mut engine = RotationEngine::new();

        engine
            .begin(&mut model, mv("U"), Duration::from_millis(300))
            .unwrap();
        for _ in 0..7 {
            engine.tick(&mut model, Duration::from_millis(47));
        }
        assert!(!engine.is_rotating());

        for cubie in model.cubies() {
            let p = cubie.position();
            assert_eq!(p, p.map(f64::round));
        }
    }

    #[test]
    fn rejects_moves_while_rotating() {
        let mut model = CubieModel::new();
        let mut engine = RotationEngine::new();

        engine
            .begin(&mut model, mv("F"), Duration::from_millis(100))
            .unwrap();
        engine.tick(&mut model, Duration::from_millis(30));

        let poses = model
            .cubies()
            .iter()
            .map(|c| (c.position(), c.orientation()))
            .collect::<Vec<_>>();

        assert_eq!(
            engine.begin(&mut model, mv("U"), Duration::ZERO),
            Err(CubeError::RotationInProgress {
                requested: "U".to_owned(),
                in_flight: mv("F")
            })
        );

        let after = model
            .cubies()
            .iter()
            .map(|c| (c.position(), c.orientation()))
            .collect::<Vec<_>>();
        assert_eq!(poses, after);
        assert_eq!(engine.in_flight(), Some(mv("F")));
    }

    #[test_log::test]
    fn layers_that_would_leave_the_lattice_never_start() {
        let mut model = CubieModel::new();
        let mut engine = RotationEngine::new();
        let corner = model.cubie_at(LatticePos::new(1, 1, 1)).unwrap();

        let orientation = model.cubie(corner).orientation();
        model
            .cubie_mut(corner)
            .set_pose(Vector3::new(1.0, 0.7, 1.0), orientation);
        let before = model
            .cubies()
            .iter()
            .map(|c| (c.position(), c.orientation()))
            .collect::<Vec<_>>();

        let err = engine
            .begin(&mut model, mv("R"), Duration::from_millis(100))
            .unwrap_err();
        let CubeError::CorruptState(CorruptStateError::OffLattice { cubie, .. }) = err else {
            panic!("expected the corner to be reported off the lattice, got {err:?}");
        };
        assert_eq!(cubie, corner);
        assert!(!engine.is_rotating());

        let after = model
            .cubies()
            .iter()
            .map(|c| (c.position(), c.orientation()))
            .collect::<Vec<_>>();
        assert_eq!(before, after);

        // Layers that do not contain the stray corner still turn
        engine.apply(&mut model, mv("L")).unwrap();
        assert_eq!(model.cubie(corner).position(), Vector3::new(1.0, 0.7, 1.0));
    }

    #[test]
    fn tilted_cubies_are_rejected_before_turning() {
        let mut model = CubieModel::new();
        let mut engine = RotationEngine::new();
        let edge = model.cubie_at(LatticePos::new(0, 1, 1)).unwrap();

        let position = model.cubie(edge).position();
        let tilt = Quaternion::from_axis_angle(Vector3::unit_y(), cgmath::Deg(30.0));
        model.cubie_mut(edge).set_pose(position, tilt);

        assert_eq!(
            engine.begin(&mut model, mv("U2"), Duration::from_millis(100)),
            Err(CubeError::CorruptState(
                CorruptStateError::OrientationNotAxisAligned { cubie: edge }
            ))
        );
        assert!(!engine.is_rotating());
        assert_eq!(model.cubie(edge).orientation(), tilt);
    }
}
