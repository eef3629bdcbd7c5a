//! The layer-by-layer beginner method, as a fixed list of named steps.

use serde::{Deserialize, Serialize};

use crate::{
    error::CubeError,
    notation::{Move, invert_sequence, parse_sequence},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionStep {
    pub title: String,
    pub explanation: String,
    /// Whitespace separated moves.
    pub algorithm: String,
}

impl SolutionStep {
    #[must_use]
    pub fn new(title: &str, explanation: &str, algorithm: &str) -> SolutionStep {
        SolutionStep {
            title: title.to_owned(),
            explanation: explanation.to_owned(),
            algorithm: algorithm.to_owned(),
        }
    }

    /// # Errors
    ///
    /// Fails if the algorithm contains a malformed token.
    pub fn moves(&self) -> Result<Vec<Move>, CubeError> {
        parse_sequence(&self.algorithm)
    }

    /// Number of moves in the algorithm.
    #[must_use]
    pub fn len(&self) -> usize {
        self.algorithm.split_whitespace().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const BEGINNER_STEPS: [(&str, &str, &str); 7] = [
    (
        "Paso 1: Cruz Blanca",
        "Forma una cruz en la cara blanca, alineando las aristas con los centros de color.",
        "D R' D' F2",
    ),
    (
        "Paso 2: Esquinas Blancas",
        "Completa la primera capa insertando las esquinas blancas en su lugar. Usa el algoritmo R' D' R D.",
        "R' D' R D U' R' D' R D U2 R' D' R D",
    ),
    (
        "Paso 3: Segunda Capa",
        "Inserta las aristas de la capa media. Usa U R U' R' U' F' U F para la derecha o U' L' U L U F U' F' para la izquierda.",
        "U R U' R' U' F' U F U' U' L' U L U F U' F'",
    ),
    (
        "Paso 4: Cruz Amarilla",
        "Crea una cruz en la cara amarilla. Usa el algoritmo F R U R' U' F' hasta formarla.",
        "F R U R' U' F'",
    ),
    (
        "Paso 5: Orientar Cruz Amarilla",
        "Alinea los colores de la cruz amarilla con los centros. Usa R U R' U R U2 R'.",
        "R U R' U R U2 R'",
    ),
    (
        "Paso 6: Permutar Esquinas",
        "Coloca las esquinas amarillas en su posición correcta. Usa U R U' L' U R' U' L.",
        "U R U' L' U R' U' L",
    ),
    (
        "Paso 7: Orientar Esquinas",
        "Gira las esquinas para finalizar. Usa (R' D' R D) repetidamente por esquina.",
        "R' D' R D R' D' R D U R' D' R D R' D' R D U2 R' D' R D R' D' R D U R' D' R D R' D' R D",
    ),
];

/// The seven canned steps of the beginner method.
#[must_use]
pub fn beginner_steps() -> Vec<SolutionStep> {
    BEGINNER_STEPS
        .iter()
        .map(|(title, explanation, algorithm)| SolutionStep::new(title, explanation, algorithm))
        .collect()
}

/// Every step's algorithm, in order.
///
/// # Errors
///
/// Fails on the first step with a malformed algorithm.
pub fn full_solution(steps: &[SolutionStep]) -> Result<Vec<Move>, CubeError> {
    let mut moves = Vec::new();
    for step in steps {
        moves.extend(step.moves()?);
    }

    Ok(moves)
}

/// The step that move number `cursor` of the full solution belongs to. A cursor
/// of `-1`, before any move has been played, belongs to the first step.
#[must_use]
pub fn step_at(steps: &[SolutionStep], cursor: isize) -> Option<&SolutionStep> {
    let mut end = 0_isize;

    steps.iter().find(|step| {
        end = end.saturating_add_unsigned(step.len());
        cursor < end
    })
}

/// Scrambles by undoing the canned solution, so playing the solution back
/// always solves the cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedScramble {
    solution: Vec<Move>,
}

impl CannedScramble {
    /// # Errors
    ///
    /// See [`full_solution`].
    pub fn new(steps: &[SolutionStep]) -> Result<CannedScramble, CubeError> {
        Ok(CannedScramble {
            solution: full_solution(steps)?,
        })
    }

    #[must_use]
    pub fn solution(&self) -> &[Move] {
        &self.solution
    }

    /// The solution reversed with every move inverted.
    #[must_use]
    pub fn moves(&self) -> Vec<Move> {
        invert_sequence(&self.solution)
    }
}
