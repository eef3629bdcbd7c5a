//! Collaborators that live outside the engine: where scrambles come from, who
//! solves the cube, and who explains a step to the user. None of them may
//! mutate a [`Puzzle`](crate::Puzzle); they only see a [`FaceletReport`].

use thiserror::Error;

use crate::{
    error::CubeError,
    method::{CannedScramble, SolutionStep},
    notation::Move,
    report::FaceletReport,
};

pub trait ScrambleSource {
    fn scramble(&mut self) -> Vec<Move>;
}

impl ScrambleSource for CannedScramble {
    fn scramble(&mut self) -> Vec<Move> {
        self.moves()
    }
}

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("The cube state cannot be written as a facelet string")]
    UnreadableState,
    #[error("Could not talk to the solver: {0}")]
    Io(#[from] std::io::Error),
    #[error("The solver found no solution for {facelets}")]
    NoSolution { facelets: String },
    #[error("The solver answered with {output:?}, which is not a move sequence")]
    Unparseable {
        output: String,
        #[source]
        source: CubeError,
    },
}

/// Finds a move sequence taking the reported state to solved.
pub trait Solver {
    /// # Errors
    ///
    /// Any failure of the solver. The caller's puzzle is untouched.
    fn solve(&mut self, report: &FaceletReport) -> Result<Vec<Move>, SolverError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplainError {
    #[error("The explainer is unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("The explainer returned nothing for {step:?}")]
    Empty { step: String },
}

/// Narrates a solution step in terms of the current cube.
pub trait Explainer {
    /// # Errors
    ///
    /// Any failure of the explainer. The caller's puzzle is untouched.
    fn explain(
        &mut self,
        step: &SolutionStep,
        report: &FaceletReport,
    ) -> Result<String, ExplainError>;
}

/// Explains a step with its stored text and how many stickers are still out of
/// place, without contacting anything.
#[derive(Debug, Copy, Clone, Default)]
pub struct CannedExplainer;

impl Explainer for CannedExplainer {
    fn explain(
        &mut self,
        step: &SolutionStep,
        report: &FaceletReport,
    ) -> Result<String, ExplainError> {
        if step.explanation.trim().is_empty() {
            return Err(ExplainError::Empty {
                step: step.title.clone(),
            });
        }

        let misplaced = report.misplaced();

        let status = if misplaced == 0 {
            "The cube is solved.".to_owned()
        } else {
            format!("{misplaced} stickers are not on their center's face yet.")
        };

        Ok(format!("{}\n{}\n{status}", step.title, step.explanation))
    }
}
