//! Draws the cube as an unfolded net:
//!
//! ```text
//!       U
//!     L F R B
//!       D
//! ```

use std::fmt::Write;

use cube_core::{Color, Face, FaceletReport};
use owo_colors::OwoColorize;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Style {
    /// Truecolor sticker backgrounds.
    Color,
    /// One letter per sticker, for terminals and logs without color.
    Plain,
}

const ROWS: [&[Option<Face>]; 3] = [
    &[None, Some(Face::U)],
    &[Some(Face::L), Some(Face::F), Some(Face::R), Some(Face::B)],
    &[None, Some(Face::D)],
];

fn sticker(color: Option<Color>, style: Style) -> String {
    match (color, style) {
        (Some(color), Style::Color) => {
            let [r, g, b] = color.rgb();
            format!("{}", "  ".on_truecolor(r, g, b))
        }
        (Some(color), Style::Plain) => {
            let initial = color.name().chars().next().unwrap_or('?');
            format!("{} ", initial.to_ascii_uppercase())
        }
        (None, _) => "? ".to_owned(),
    }
}

#[must_use]
pub fn net(report: &FaceletReport, style: Style) -> String {
    let mut out = String::new();

    for row in ROWS {
        let faces = row
            .iter()
            .map(|face| face.and_then(|face| report.face(face)))
            .collect::<Vec<_>>();

        for line in 0..3 {
            let mut text = String::new();
            for (slot, face) in row.iter().zip(&faces) {
                match (slot, face) {
                    (None, _) => text.push_str("       "),
                    (Some(_), Some(colors)) => {
                        for color in &colors[line * 3..line * 3 + 3] {
                            text.push_str(&sticker(Some(*color), style));
                        }
                        text.push(' ');
                    }
                    (Some(_), None) => {
                        for _ in 0..3 {
                            text.push_str(&sticker(None, style));
                        }
                        text.push(' ');
                    }
                }
            }
            let _ = writeln!(out, "{}", text.trim_end());
        }
    }

    out
}
