//! Face-labeled description of the cube as seen from outside.
//!
//! The report is the only view of the cube handed to solvers and explainers.
//! Every facelet's world direction is obtained by rotating its local direction
//! by the cubie's orientation and is then classified against the six face
//! axes. A facelet that clears no axis is reported as unknown; that can only
//! happen if the report was taken mid-rotation or the model is corrupt.

use std::{collections::HashMap, fmt};

use crate::{
    color::Color,
    cubie::{CubieId, CubieModel},
    error::CorruptStateError,
    geometry::{CLASSIFY_THRESHOLD, Direction, LatticePos},
    notation::Face,
};

/// Face order of the 54 character facelet string.
pub const FACELET_STRING_ORDER: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sticker {
    /// The world face this sticker shows on, or `None` if it could not be
    /// classified.
    pub facing: Option<Direction>,
    pub color: Color,
    /// Index of the facelet within its cubie.
    pub facelet: usize,
    /// Unclassified world direction of the facelet.
    pub direction: [f64; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct CubieReport {
    pub id: CubieId,
    pub position: LatticePos,
    pub stickers: Vec<Sticker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceletReport {
    /// Sorted by position.
    cubies: Vec<CubieReport>,
}

impl Face {
    /// The world direction this face points out of.
    #[must_use]
    pub fn direction(self) -> Direction {
        let geometry = self.geometry();
        Direction::new(geometry.axis, geometry.layer > 0)
    }

    #[must_use]
    pub fn from_direction(direction: Direction) -> Face {
        match direction {
            Direction::PosX => Face::R,
            Direction::NegX => Face::L,
            Direction::PosY => Face::U,
            Direction::NegY => Face::D,
            Direction::PosZ => Face::F,
            Direction::NegZ => Face::B,
        }
    }
}

/// Slots of a face in reading order: left to right, then top to bottom, as
/// seen looking straight at the face. The top of the U face is the back edge,
/// the top of the D face is the front edge, and the top of the side faces is
/// the U face.
#[must_use]
pub fn face_grid(face: Face) -> [LatticePos; 9] {
    let direction = face.direction();
    let mut normal = [0_i8; 3];
    normal[direction.axis().index()] = direction.sign();

    let (up, right): ([i8; 3], [i8; 3]) = match face {
        Face::U => ([0, 0, -1], [1, 0, 0]),
        Face::D => ([0, 0, 1], [1, 0, 0]),
        Face::R => ([0, 1, 0], [0, 0, -1]),
        Face::L => ([0, 1, 0], [0, 0, 1]),
        Face::F => ([0, 1, 0], [1, 0, 0]),
        Face::B => ([0, 1, 0], [-1, 0, 0]),
    };

    std::array::from_fn(|i| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let (row, col) = ((i / 3) as i8, (i % 3) as i8);
        let coord = |axis: usize| normal[axis] + up[axis] * (1 - row) + right[axis] * (col - 1);
        LatticePos([coord(0), coord(1), coord(2)])
    })
}

/// Describes every cubie of a settled model.
///
/// # Errors
///
/// Fails if a cubie is off the lattice, which means the model is mid-rotation
/// or corrupt. Unclassifiable facelets are not an error here; see
/// [`FaceletReport::validate`].
pub fn describe(model: &CubieModel) -> Result<FaceletReport, CorruptStateError> {
    let mut cubies = model
        .cubies()
        .iter()
        .map(|cubie| {
            Ok(CubieReport {
                id: cubie.id(),
                position: cubie.lattice_position()?,
                stickers: cubie
                    .facelets()
                    .iter()
                    .enumerate()
                    .map(|(facelet, f)| {
                        let direction = cubie.facelet_direction(f);
                        Sticker {
                            facing: Direction::classify(direction, CLASSIFY_THRESHOLD),
                            color: f.color,
                            facelet,
                            direction: direction.into(),
                        }
                    })
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, CorruptStateError>>()?;

    cubies.sort_by_key(|cubie| cubie.position);

    Ok(FaceletReport { cubies })
}

impl FaceletReport {
    #[must_use]
    pub fn cubies(&self) -> &[CubieReport] {
        &self.cubies
    }

    #[must_use]
    pub fn get(&self, position: LatticePos) -> Option<&CubieReport> {
        self.cubies
            .binary_search_by_key(&position, |cubie| cubie.position)
            .ok()
            .map(|i| &self.cubies[i])
    }

    /// The color showing at `position` on the face pointing along `facing`.
    #[must_use]
    pub fn sticker(&self, position: LatticePos, facing: Direction) -> Option<Color> {
        self.get(position)?
            .stickers
            .iter()
            .find(|sticker| sticker.facing == Some(facing))
            .map(|sticker| sticker.color)
    }

    /// Every sticker facing `facing`, in position order.
    #[must_use]
    pub fn stickers_facing(&self, facing: Direction) -> Vec<(LatticePos, Color)> {
        self.cubies
            .iter()
            .flat_map(|cubie| {
                cubie
                    .stickers
                    .iter()
                    .filter(move |sticker| sticker.facing == Some(facing))
                    .map(move |sticker| (cubie.position, sticker.color))
            })
            .collect()
    }

    /// The nine colors of a face in reading order, see [`face_grid`].
    #[must_use]
    pub fn face(&self, face: Face) -> Option<[Color; 9]> {
        let facing = face.direction();
        let grid = face_grid(face);

        let mut colors = [Color::White; 9];
        for (color, position) in colors.iter_mut().zip(grid) {
            *color = self.sticker(position, facing)?;
        }

        Some(colors)
    }

    /// Checks that every sticker was classified onto a face.
    ///
    /// # Errors
    ///
    /// Reports the first sticker that was not.
    pub fn validate(&self) -> Result<(), CorruptStateError> {
        for cubie in &self.cubies {
            if let Some(sticker) = cubie.stickers.iter().find(|s| s.facing.is_none()) {
                return Err(CorruptStateError::UnclassifiedFacelet {
                    cubie: cubie.id,
                    facelet: sticker.facelet,
                    direction: sticker.direction,
                });
            }
        }

        Ok(())
    }

    /// Stickers whose color differs from the center of the face they show
    /// on. Unclassified stickers count as misplaced.
    #[must_use]
    pub fn misplaced(&self) -> usize {
        self.cubies
            .iter()
            .flat_map(|cubie| &cubie.stickers)
            .filter(|sticker| {
                let center = sticker.facing.and_then(|facing| {
                    self.sticker(face_grid(Face::from_direction(facing))[4], facing)
                });
                center != Some(sticker.color)
            })
            .count()
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        Face::ALL.into_iter().all(|face| {
            self.face(face)
                .is_some_and(|colors| colors.iter().all(|c| *c == colors[4]))
        })
    }

    /// The 54 character `URFDLB` facelet string used by two-phase solvers.
    /// Each color is named by the face whose center currently shows it.
    #[must_use]
    pub fn to_facelet_string(&self) -> Option<String> {
        let faces = FACELET_STRING_ORDER.map(|face| self.face(face));

        let mut letters = HashMap::new();
        for (face, colors) in FACELET_STRING_ORDER.iter().zip(&faces) {
            letters.insert((*colors)?[4], face.letter());
        }

        let mut out = String::with_capacity(54);
        for colors in faces {
            for color in colors? {
                out.push(*letters.get(&color)?);
            }
        }

        Some(out)
    }
}

impl fmt::Display for FaceletReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current cube state:")?;

        for cubie in &self.cubies {
            write!(f, "Cubie at {}:", cubie.position)?;
            for (i, sticker) in cubie.stickers.iter().enumerate() {
                let face = sticker.facing.map_or("unknown", Direction::face_name);
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{sep}{face}={}", sticker.color)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
