use std::time::Duration;

use log::{debug, info};

use crate::{
    cubie::CubieModel,
    error::CubeError,
    notation::{Move, parse_sequence},
    report::{self, FaceletReport},
    rotation::{RotationEngine, RotationStatus},
    sequence::MoveTarget,
};

/// A cube together with the engine that turns it. This is the single mutator of
/// its model.
#[derive(Debug, Clone, Default)]
pub struct Puzzle {
    model: CubieModel,
    engine: RotationEngine,
}

impl Puzzle {
    /// A solved puzzle.
    #[must_use]
    pub fn new() -> Puzzle {
        Puzzle::default()
    }

    #[must_use]
    pub fn model(&self) -> &CubieModel {
        &self.model
    }

    #[must_use]
    pub fn is_rotating(&self) -> bool {
        self.engine.is_rotating()
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<Move> {
        self.engine.in_flight()
    }

    /// Starts an animated move. Drive it to completion with
    /// [`Puzzle::tick`].
    ///
    /// # Errors
    ///
    /// See [`RotationEngine::begin`].
    pub fn begin_move(
        &mut self,
        mv: Move,
        duration: Duration,
    ) -> Result<RotationStatus, CubeError> {
        self.engine.begin(&mut self.model, mv, duration)
    }

    /// Advances the in-flight move, if any.
    pub fn tick(&mut self, elapsed: Duration) -> RotationStatus {
        self.engine.tick(&mut self.model, elapsed)
    }

    /// Applies `mv` with no animation.
    ///
    /// # Errors
    ///
    /// See [`RotationEngine::begin`].
    pub fn apply(&mut self, mv: Move) -> Result<(), CubeError> {
        self.engine.apply(&mut self.model, mv)
    }

    /// Applies every move in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`Puzzle::apply`].
    pub fn apply_all(&mut self, moves: &[Move]) -> Result<(), CubeError> {
        for &mv in moves {
            self.apply(mv)?;
        }

        Ok(())
    }

    /// Parses a whitespace separated sequence and applies it. Nothing is
    /// applied unless every token parses.
    ///
    /// # Errors
    ///
    /// Fails with [`CubeError::SequenceToken`] on the first malformed token.
    pub fn apply_notation(&mut self, text: &str) -> Result<Vec<Move>, CubeError> {
        let moves = parse_sequence(text)?;
        debug!(target: "puzzle", "Applying {} moves", moves.len());
        self.apply_all(&moves)?;
        Ok(moves)
    }

    /// Returns every cubie to its solved pose.
    ///
    /// # Errors
    ///
    /// Refuses to reset while a layer is rotating.
    pub fn reset(&mut self) -> Result<(), CubeError> {
        if let Some(in_flight) = self.engine.in_flight() {
            return Err(CubeError::RotationInProgress {
                requested: "reset".to_owned(),
                in_flight,
            });
        }

        self.model.reset();
        info!("Cube reset");
        Ok(())
    }

    /// A validated description of the settled cube.
    ///
    /// # Errors
    ///
    /// Refuses while a layer is rotating, and fails if the model is corrupt.
    pub fn describe(&self) -> Result<FaceletReport, CubeError> {
        if let Some(in_flight) = self.engine.in_flight() {
            return Err(CubeError::RotationInProgress {
                requested: "describe".to_owned(),
                in_flight,
            });
        }

        let report = report::describe(&self.model)?;
        report.validate()?;
        Ok(report)
    }
}

impl MoveTarget for Puzzle {
    type Error = CubeError;

    fn start_move(&mut self, mv: Move, duration: Duration) -> Result<(), CubeError> {
        self.begin_move(mv, duration).map(|_| ())
    }
}
