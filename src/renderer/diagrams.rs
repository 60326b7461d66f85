//! Chord diagrams — a fretboard grid per used chord, stacked in a column
//! next to the right margin.

use super::constants::*;
use super::{Anchor, FontFace, PageSetup, Point, Surface, TextStyle};
use crate::chords::ChordLookup;
use crate::error::{Error, Result};

pub(super) struct ChordShape<'a> {
    pub(super) name: &'a str,
    pub(super) frets: &'a [u32],
}

/// Look up every used chord, failing on the first one without a shape.
pub(super) fn resolve<'a>(names: &'a [String], lookup: ChordLookup<'a>) -> Result<Vec<ChordShape<'a>>> {
    names
        .iter()
        .map(|name| {
            lookup
                .get(name)
                .map(|frets| ChordShape { name, frets })
                .ok_or_else(|| Error::UndefinedChord { name: name.clone() })
        })
        .collect()
}

pub(super) fn draw<S: Surface + ?Sized>(
    surface: &mut S,
    page: &PageSetup,
    anchor_y: f64,
    shapes: &[ChordShape],
) {
    let x = page.right_edge() - DIAGRAM_COLUMN_INSET;
    let mut y = anchor_y + DIAGRAM_COLUMN_DROP;
    for shape in shapes {
        y = draw_diagram(surface, Point::new(x, y), shape);
    }
}

/// Draw one diagram with its label baseline at `origin.y`; returns the
/// label baseline for the next one.
fn draw_diagram<S: Surface + ?Sized>(surface: &mut S, origin: Point, shape: &ChordShape) -> f64 {
    let strings = shape.frets.len().max(2);
    let col = DIAGRAM_WIDTH / (strings - 1) as f64;
    let row = DIAGRAM_HEIGHT / 3.0;
    let label = TextStyle::new(DIAGRAM_LABEL_SIZE, FontFace::Regular).anchor(Anchor::Middle);

    surface.place_text(
        Point::new(origin.x + DIAGRAM_WIDTH / 2.0, origin.y),
        shape.name,
        &label,
    );

    let nut = origin.y + 0.5 * row;
    let bottom = nut + FRET_ROWS as f64 * row;
    let right = origin.x + (strings - 1) as f64 * col;
    for fret in 0..=FRET_ROWS {
        let y = nut + fret as f64 * row;
        surface.draw_line(Point::new(origin.x, y), Point::new(right, y));
    }
    for string in 0..strings {
        let x = origin.x + string as f64 * col;
        surface.draw_line(Point::new(x, nut), Point::new(x, bottom));
    }

    let base = base_fret(shape.frets);
    if base > 1 {
        let style = TextStyle::new(BASE_FRET_LABEL_SIZE, FontFace::Regular);
        surface.place_text(Point::new(right + BASE_FRET_GAP, nut + row), &format!("{base}fr"), &style);
    }

    let radius = col / 3.0;
    for (string, &fret) in shape.frets.iter().enumerate() {
        let x = origin.x + string as f64 * col;
        if fret == 0 {
            surface.draw_marker(Point::new(x, nut), radius, false);
        } else {
            // Between the wires above and below the fret's row in the window.
            let slot = fret.max(base) - base + 1;
            surface.draw_marker(Point::new(x, nut + (f64::from(slot) - 0.5) * row), radius, true);
        }
    }

    bottom + 1.5 * row
}

/// First fret shown in the grid. Shapes within the first `FRET_ROWS` frets
/// start at 1. Higher shapes start at their lowest fretted string, unless
/// the span is too wide for the grid; then the top fret takes the last row
/// and lower strings are drawn in the first.
fn base_fret(frets: &[u32]) -> u32 {
    let top = frets.iter().copied().max().unwrap_or(0);
    if top as usize <= FRET_ROWS {
        return 1;
    }
    let lowest = frets.iter().copied().filter(|&f| f > 0).min().unwrap_or(top);
    lowest.max(top + 1 - FRET_ROWS as u32)
}
