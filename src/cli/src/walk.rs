//! The interactive walk-through: scramble, then step through a solution one
//! move at a time, turn faces by hand, or ask for help with the current step.

use std::{
    io::{BufRead, Write},
    time::Duration,
};

use color_eyre::eyre::WrapErr;
use cube_core::{
    Move, MoveTarget, Puzzle, RotationStatus, SequencePlayer,
    external::{Explainer, ScrambleSource, Solver},
    method::{CannedScramble, SolutionStep, step_at},
};
use log::{info, warn};

use crate::{
    animate,
    config::Config,
    render::{self, Style},
};

const HELP: &str = "\
Commands:
  n, next       play the next move of the solution (also an empty line)
  p, prev       undo the last move of the solution
  e, explain    explain the current step
  s, state      list every cubie and its stickers
  solve         ask the solver for a solution from here
  scramble      scramble again and load the beginner method
  reset         return to a solved cube
  h, help       show this message
  q, quit       leave
Anything else is read as moves, e.g. `R U' F2`.";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Where the loaded sequence came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Loaded {
    Nothing,
    Method,
    Solver,
}

pub struct Session<W> {
    config: Config,
    style: Style,
    puzzle: Puzzle,
    player: SequencePlayer,
    steps: Vec<SolutionStep>,
    loaded: Loaded,
    solver: Box<dyn Solver>,
    explainer: Box<dyn Explainer>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        config: Config,
        style: Style,
        solver: Box<dyn Solver>,
        explainer: Box<dyn Explainer>,
        out: W,
    ) -> Session<W> {
        Session {
            player: SequencePlayer::new(config.move_duration()),
            steps: config.steps(),
            config,
            style,
            puzzle: Puzzle::new(),
            loaded: Loaded::Nothing,
            solver,
            explainer,
            out,
        }
    }

    #[must_use]
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    #[must_use]
    pub fn player(&self) -> &SequencePlayer {
        &self.player
    }

    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Reads commands until `quit` or the end of `input`.
    pub fn run(&mut self, input: impl BufRead) -> color_eyre::Result<()> {
        self.scramble()?;
        writeln!(self.out, "{HELP}")?;

        for line in input.lines() {
            if self.handle(&line?)? == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Resets the cube, plays the canned scramble, and loads the beginner
    /// method's solution.
    pub fn scramble(&mut self) -> color_eyre::Result<()> {
        let mut source = CannedScramble::new(&self.steps)?;

        self.puzzle.reset()?;
        let moves = source.scramble();
        info!(target: "walk", "Scrambling with {} moves", moves.len());
        for mv in moves {
            self.play(mv, self.config.scramble_duration(), false)?;
        }

        self.player.load(source.solution().to_vec());
        self.loaded = Loaded::Method;

        writeln!(
            self.out,
            "Scrambled. The beginner method solves it in {} moves.",
            self.player.len()
        )?;
        self.show()
    }

    pub fn handle(&mut self, line: &str) -> color_eyre::Result<Flow> {
        match line.trim() {
            "" | "n" | "next" => self.next()?,
            "p" | "prev" => self.prev()?,
            "e" | "explain" => self.explain()?,
            "s" | "state" => {
                let report = self.puzzle.describe()?;
                write!(self.out, "{report}")?;
            }
            "solve" => self.solve()?,
            "scramble" => self.scramble()?,
            "reset" => {
                self.puzzle.reset()?;
                self.player.load(Vec::new());
                self.loaded = Loaded::Nothing;
                self.show()?;
            }
            "h" | "help" | "?" => writeln!(self.out, "{HELP}")?,
            "q" | "quit" | "exit" => return Ok(Flow::Quit),
            moves => self.manual(moves)?,
        }

        Ok(Flow::Continue)
    }

    fn next(&mut self) -> color_eyre::Result<()> {
        let Some(mv) = self.player.advance(&mut self.puzzle)? else {
            writeln!(self.out, "Nothing left to play.")?;
            return Ok(());
        };

        self.finish(mv, true)?;
        self.status(&format!("Played {mv}"))?;
        self.show()
    }

    fn prev(&mut self) -> color_eyre::Result<()> {
        let Some(mv) = self.player.retreat(&mut self.puzzle)? else {
            writeln!(self.out, "Already at the start.")?;
            return Ok(());
        };

        self.finish(mv.inverse(), true)?;
        self.status(&format!("Undid {mv}"))?;
        self.show()
    }

    fn status(&mut self, action: &str) -> color_eyre::Result<()> {
        let (played, total) = self.player.progress();
        write!(self.out, "{action} ({played}/{total})")?;

        if self.loaded == Loaded::Method {
            if let Some(step) = step_at(&self.steps, self.player.cursor()) {
                write!(self.out, " {}", step.title)?;
            }
        }

        writeln!(self.out)?;
        Ok(())
    }

    fn explain(&mut self) -> color_eyre::Result<()> {
        if self.loaded != Loaded::Method {
            writeln!(
                self.out,
                "Explanations follow the beginner method; `scramble` to load it."
            )?;
            return Ok(());
        }

        let Some(step) = step_at(&self.steps, self.player.cursor()) else {
            writeln!(self.out, "The method is complete.")?;
            return Ok(());
        };

        let report = self.puzzle.describe()?;
        match self.explainer.explain(step, &report) {
            Ok(text) => writeln!(self.out, "{text}")?,
            Err(e) => {
                warn!(target: "walk", "{e}");
                writeln!(self.out, "No explanation available: {e}")?;
            }
        }

        Ok(())
    }

    fn solve(&mut self) -> color_eyre::Result<()> {
        let report = self.puzzle.describe()?;

        match self.solver.solve(&report) {
            Ok(moves) => {
                writeln!(
                    self.out,
                    "Solution: {} ({} moves)",
                    cube_core::notation::format_sequence(&moves),
                    moves.len()
                )?;
                self.player.load(moves);
                self.loaded = Loaded::Solver;
            }
            Err(e) => {
                warn!(target: "walk", "Solver failed: {e}");
                writeln!(self.out, "The solver failed: {e}")?;
            }
        }

        Ok(())
    }

    /// Applies hand-typed moves. Invalid tokens are reported and skipped.
    fn manual(&mut self, text: &str) -> color_eyre::Result<()> {
        let mut played = 0;

        for token in text.split_whitespace() {
            match Move::parse(token) {
                Ok(mv) => {
                    self.play(mv, self.config.move_duration(), true)?;
                    played += 1;
                }
                Err(e) => {
                    warn!(target: "walk", "{e}");
                    writeln!(self.out, "Skipping {token:?}: not a move")?;
                }
            }
        }

        if played == 0 {
            return Ok(());
        }

        if self.loaded != Loaded::Nothing {
            writeln!(self.out, "Manual moves discard the loaded solution.")?;
            self.player.load(Vec::new());
            self.loaded = Loaded::Nothing;
        }

        self.show()
    }

    fn play(
        &mut self,
        mv: Move,
        duration: Duration,
        show_progress: bool,
    ) -> color_eyre::Result<()> {
        self.puzzle
            .start_move(mv, duration)
            .wrap_err_with(|| format!("Could not start {mv}"))?;
        self.finish(mv, show_progress)
    }

    /// Animates the in-flight move, drawing a progress bar unless told not to.
    fn finish(&mut self, mv: Move, show_progress: bool) -> color_eyre::Result<()> {
        let out = &mut self.out;
        let mut drawn = false;
        let mut failed = None;

        animate::finish(&mut self.puzzle, self.config.frame(), |status| {
            if !show_progress || failed.is_some() {
                return;
            }
            if let RotationStatus::InProgress { progress, .. } = status {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let filled = (progress * 20.0) as usize;
                let drawing = write!(out, "\r{mv:<3}[{:<20}]", "#".repeat(filled))
                    .and_then(|()| out.flush());
                match drawing {
                    Ok(()) => drawn = true,
                    Err(e) => failed = Some(e),
                }
            }
        });

        if let Some(e) = failed {
            return Err(e).wrap_err("Could not draw the progress bar");
        }

        if drawn {
            writeln!(self.out)?;
        }

        Ok(())
    }

    fn show(&mut self) -> color_eyre::Result<()> {
        let report = self.puzzle.describe()?;
        write!(self.out, "{}", render::net(&report, self.style))?;
        if report.is_solved() {
            writeln!(self.out, "Solved!")?;
        }
        Ok(())
    }
}
