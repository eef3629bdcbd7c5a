//! Stepping forwards and backwards through a move list.

use std::time::Duration;

use log::debug;

use crate::notation::Move;

/// Something that can be asked to turn a layer.
pub trait MoveTarget {
    type Error;

    /// Starts `mv`, animating it over `duration`. A zero duration applies it
    /// immediately. The move only counts as played if this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Whatever keeps the target from accepting the move, for example another
    /// move still being animated.
    fn start_move(&mut self, mv: Move, duration: Duration) -> Result<(), Self::Error>;
}

/// A cursor over a loaded move list. The cursor is the index of the last move
/// played, so it is `-1` before the first move.
#[derive(Debug, Clone)]
pub struct SequencePlayer {
    moves: Vec<Move>,
    cursor: isize,
    duration: Duration,
}

impl Default for SequencePlayer {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl SequencePlayer {
    #[must_use]
    pub fn new(duration: Duration) -> SequencePlayer {
        SequencePlayer {
            moves: Vec::new(),
            cursor: -1,
            duration,
        }
    }

    /// Replaces the sequence and rewinds the cursor. The target is not touched.
    pub fn load(&mut self, moves: Vec<Move>) {
        debug!(target: "sequence", "Loaded {} moves", moves.len());
        self.moves = moves;
        self.cursor = -1;
    }

    /// Plays the next move, returning it, or `None` at the end of the sequence.
    ///
    /// # Errors
    ///
    /// Propagates the target's refusal; the cursor does not move.
    pub fn advance<T: MoveTarget>(&mut self, target: &mut T) -> Result<Option<Move>, T::Error> {
        let Some(&mv) = self.moves.get(self.next_index()) else {
            return Ok(None);
        };

        target.start_move(mv, self.duration)?;
        self.cursor += 1;

        Ok(Some(mv))
    }

    /// Undoes the last played move by playing its inverse, returning the move
    /// that was undone, or `None` at the start of the sequence.
    ///
    /// # Errors
    ///
    /// Propagates the target's refusal; the cursor does not move.
    pub fn retreat<T: MoveTarget>(&mut self, target: &mut T) -> Result<Option<Move>, T::Error> {
        let Some(mv) = self.current() else {
            return Ok(None);
        };

        target.start_move(mv.inverse(), self.duration)?;
        self.cursor -= 1;

        Ok(Some(mv))
    }

    #[must_use]
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The last move played.
    #[must_use]
    pub fn current(&self) -> Option<Move> {
        usize::try_from(self.cursor)
            .ok()
            .and_then(|i| self.moves.get(i).copied())
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.next_index() < self.moves.len()
    }

    #[must_use]
    pub fn can_retreat(&self) -> bool {
        self.cursor >= 0
    }

    /// Moves played and total moves.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.next_index(), self.moves.len())
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    #[allow(clippy::cast_sign_loss)]
    fn next_index(&self) -> usize {
        // The cursor never drops below -1
        (self.cursor + 1) as usize
    }
}
