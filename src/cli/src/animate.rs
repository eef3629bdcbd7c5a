use std::{
    thread,
    time::{Duration, Instant},
};

use cube_core::{Puzzle, RotationStatus};
use log::trace;

/// Helper for accurate frame intervals.
pub struct Ticker {
    now: Instant,
}

impl Ticker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    pub fn wait(&mut self, delay: Duration) {
        // Advance the expected next time and sleep until that instant.
        self.now += delay;
        thread::sleep(self.now.saturating_duration_since(Instant::now()));
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticks the in-flight rotation once per `frame` until it completes, handing
/// every intermediate status to `on_frame`. Returns at once if nothing is
/// rotating.
pub fn finish(puzzle: &mut Puzzle, frame: Duration, mut on_frame: impl FnMut(RotationStatus)) {
    let mut ticker = Ticker::new();
    let mut frames = 0_u32;

    while puzzle.is_rotating() {
        ticker.wait(frame);
        let status = puzzle.tick(frame);
        frames += 1;
        on_frame(status);

        if let RotationStatus::Completed(mv) = status {
            trace!(target: "animate", "{mv} took {frames} frames");
        }
    }
}
