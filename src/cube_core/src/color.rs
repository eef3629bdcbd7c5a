use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Direction;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Yellow,
    Green,
    Blue,
    Red,
    Orange,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Red,
        Color::Orange,
    ];

    /// The color of the face pointing along `direction` on a solved cube.
    #[must_use]
    pub fn for_direction(direction: Direction) -> Color {
        match direction {
            Direction::PosX => Color::Red,
            Direction::NegX => Color::Orange,
            Direction::PosY => Color::White,
            Direction::NegY => Color::Yellow,
            Direction::PosZ => Color::Green,
            Direction::NegZ => Color::Blue,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Orange => "orange",
        }
    }

    /// The `0xRRGGBB` value used to paint the sticker.
    #[must_use]
    pub fn hex(self) -> u32 {
        match self {
            Color::White => 0x00ff_ffff,
            Color::Yellow => 0x00ff_d700,
            Color::Green => 0x0000_9e60,
            Color::Blue => 0x0000_51ba,
            Color::Red => 0x00c4_1e3a,
            Color::Orange => 0x00ff_5800,
        }
    }

    #[must_use]
    pub fn rgb(self) -> [u8; 3] {
        let [_, r, g, b] = self.hex().to_be_bytes();
        [r, g, b]
    }

    #[must_use]
    pub fn from_hex(hex: u32) -> Option<Color> {
        Color::ALL.into_iter().find(|color| color.hex() == hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
