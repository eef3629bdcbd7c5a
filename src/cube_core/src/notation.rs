//! Singmaster notation for the six outer faces.
//!
//! A [`Move`] is a face plus a number of quarter turns. Input is accepted in
//! either case and output is always upper case, so `r'` and `R'` parse to the
//! same move and both format as `R'`.

use std::{fmt, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{CubeError, InvalidMoveError};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    R,
    L,
    U,
    D,
    F,
    B,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [R, L, U, D, F, B];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Face::R => 'R',
            Face::L => 'L',
            Face::U => 'U',
            Face::D => 'D',
            Face::F => 'F',
            Face::B => 'B',
        }
    }

    #[must_use]
    pub fn from_letter(letter: char) -> Option<Face> {
        match letter.to_ascii_uppercase() {
            'R' => Some(Face::R),
            'L' => Some(Face::L),
            'U' => Some(Face::U),
            'D' => Some(Face::D),
            'F' => Some(Face::F),
            'B' => Some(Face::B),
            _ => None,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// How far a face turns, in signed quarter turns. Positive is clockwise as seen
/// when looking straight at the face.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i8)]
pub enum Turns {
    Clockwise = 1,
    CounterClockwise = -1,
    Half = 2,
}

impl Turns {
    #[must_use]
    pub fn amount(self) -> i8 {
        self as i8
    }

    #[must_use]
    pub fn inverse(self) -> Turns {
        match self {
            Turns::Clockwise => Turns::CounterClockwise,
            Turns::CounterClockwise => Turns::Clockwise,
            Turns::Half => Turns::Half,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Turns::Clockwise => "",
            Turns::CounterClockwise => "'",
            Turns::Half => "2",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Move {
    pub face: Face,
    pub turns: Turns,
}

impl Move {
    #[must_use]
    pub const fn new(face: Face, turns: Turns) -> Move {
        Move { face, turns }
    }

    /// Parses exactly one token, e.g. `R`, `u'` or `F2`.
    ///
    /// # Errors
    ///
    /// Fails on the empty string, an unknown face letter, or anything after the
    /// optional modifier.
    pub fn parse(token: &str) -> Result<Move, InvalidMoveError> {
        let err = || InvalidMoveError {
            token: token.to_owned(),
        };

        let mut chars = token.chars();
        let face = chars.next().and_then(Face::from_letter).ok_or_else(err)?;

        let turns = match chars.as_str() {
            "" => Turns::Clockwise,
            "'" => Turns::CounterClockwise,
            "2" => Turns::Half,
            _ => return Err(err()),
        };

        Ok(Move { face, turns })
    }

    #[must_use]
    pub fn inverse(self) -> Move {
        Move {
            face: self.face,
            turns: self.turns.inverse(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.turns.suffix())
    }
}

impl FromStr for Move {
    type Err = InvalidMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}

impl TryFrom<String> for Move {
    type Error = InvalidMoveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Move::parse(&value)
    }
}

impl From<Move> for String {
    fn from(value: Move) -> Self {
        value.to_string()
    }
}

/// # Errors
///
/// See [`Move::parse`].
pub fn parse(token: &str) -> Result<Move, InvalidMoveError> {
    Move::parse(token)
}

#[must_use]
pub fn invert(mv: Move) -> Move {
    mv.inverse()
}

#[must_use]
pub fn format(mv: Move) -> String {
    mv.to_string()
}

/// Parses a whitespace separated list of moves. Runs of whitespace are a single
/// separator and never produce an error.
///
/// # Errors
///
/// Reports the index and text of the first invalid token.
pub fn parse_sequence(text: &str) -> Result<Vec<Move>, CubeError> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            Move::parse(token).map_err(|source| CubeError::SequenceToken { index, source })
        })
        .collect()
}

/// The sequence that undoes `moves`: reversed, with every move inverted.
#[must_use]
pub fn invert_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}

#[must_use]
pub fn format_sequence(moves: &[Move]) -> String {
    moves.iter().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_modifier() {
        assert_eq!(parse("R").unwrap(), Move::new(Face::R, Turns::Clockwise));
        assert_eq!(
            parse("U'").unwrap(),
            Move::new(Face::U, Turns::CounterClockwise)
        );
        assert_eq!(parse("F2").unwrap(), Move::new(Face::F, Turns::Half));
        assert_eq!(parse("b2").unwrap(), Move::new(Face::B, Turns::Half));
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "X", "R3", "R''", "RU", "R2'", " R", "'", "2", "Rw"] {
            assert_eq!(
                parse(token),
                Err(InvalidMoveError {
                    token: token.to_owned()
                }),
                "{token:?} should not parse"
            );
        }
    }

    #[test]
    fn formats_canonically() {
        for (input, canonical) in [
            ("R", "R"),
            ("r", "R"),
            ("l'", "L'"),
            ("D'", "D'"),
            ("u2", "U2"),
            ("B2", "B2"),
        ] {
            assert_eq!(format(parse(input).unwrap()), canonical);
        }
    }

    #[test]
    fn inverses() {
        assert_eq!(format(invert(parse("R").unwrap())), "R'");
        assert_eq!(format(invert(parse("R'").unwrap())), "R");
        assert_eq!(format(invert(parse("R2").unwrap())), "R2");

        for face in Face::ALL {
            for turns in [Turns::Clockwise, Turns::CounterClockwise, Turns::Half] {
                let mv = Move::new(face, turns);
                assert_eq!(mv.inverse().inverse(), mv);
                assert_eq!(
                    (mv.turns.amount() + mv.inverse().turns.amount()).rem_euclid(4),
                    0
                );
            }
        }
    }

    #[test]
    fn sequences_ignore_extra_whitespace() {
        let moves = parse_sequence("  R U'\t\tF2 \n D  ").unwrap();
        assert_eq!(format_sequence(&moves), "R U' F2 D");
        assert!(parse_sequence("   ").unwrap().is_empty());
    }

    #[test]
    fn sequence_errors_point_at_the_token() {
        let err = parse_sequence("R U X2 F").unwrap_err();
        assert_eq!(
            err,
            CubeError::SequenceToken {
                index: 2,
                source: InvalidMoveError {
                    token: "X2".to_owned()
                }
            }
        );
    }

    #[test]
    fn inverted_sequences_reverse_order() {
        let moves = parse_sequence("R U F2 D'").unwrap();
        assert_eq!(format_sequence(&invert_sequence(&moves)), "D F2 U' R'");
    }
}
