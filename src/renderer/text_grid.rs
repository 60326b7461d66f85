//! Plain-text surface — approximates the page on a character grid.
//!
//! Every text run snaps to a cell: the column from its x position, the row
//! from its baseline. Baselines closer than half a cell share a row, wider
//! gaps leave as many empty rows as whole lines they span. Accent shapes
//! become `|` bars and `=` rules; fretboard grids and markers are dropped.

use super::{Anchor, Point, Size, Surface, TextStyle, Tone};
use super::constants::{CHAR_WIDTH_FACTOR, LEADING_FACTOR};

struct Run {
    at: Point,
    text: String,
    anchor: Anchor,
}

pub struct TextSurface {
    cell: Size,
    runs: Vec<Run>,
    accents: Vec<(Point, Size)>,
    pen: Point,
    output: Option<String>,
}

impl TextSurface {
    pub fn new(cell: Size) -> Self {
        Self {
            cell,
            runs: Vec::new(),
            accents: Vec::new(),
            pen: Point::default(),
            output: None,
        }
    }

    /// One cell per nominal character of a `font_size` body line.
    pub fn for_font_size(font_size: f64) -> Self {
        Self::new(Size::new(font_size * CHAR_WIDTH_FACTOR, font_size * LEADING_FACTOR))
    }

    pub fn into_string(self) -> String {
        match self.output {
            Some(output) => output,
            None => self.compose(),
        }
    }

    fn column(&self, x: f64) -> usize {
        (x / self.cell.width).round().max(0.0) as usize
    }

    // ── Composition ─────────────────────────────────────────────────

    fn compose(&self) -> String {
        let rows = Rows::cluster(self.baselines(), self.cell.height);
        let mut grid = Grid::default();

        for run in &self.runs {
            let chars: Vec<char> = run.text.chars().collect();
            let x = match run.anchor {
                Anchor::Start => run.at.x,
                Anchor::Middle => run.at.x - chars.len() as f64 * self.cell.width / 2.0,
            };
            grid.write(rows.row_of(run.at.y), self.column(x), &chars);
        }

        for &(at, size) in &self.accents {
            if size.height > size.width {
                let col = self.column(at.x);
                for row in rows.within(at.y, at.y + size.height) {
                    grid.fill(row, col..col + 1, '|');
                }
            } else {
                let row = rows.row_of(at.y + size.height);
                grid.fill(row, self.column(at.x)..self.column(at.x + size.width), '=');
            }
        }

        grid.render()
    }

    fn baselines(&self) -> Vec<f64> {
        let texts = self.runs.iter().map(|run| run.at.y);
        let rules = self
            .accents
            .iter()
            .filter(|(_, size)| size.height <= size.width)
            .map(|(at, size)| at.y + size.height);
        texts.chain(rules).collect()
    }
}

impl Surface for TextSurface {
    fn begin_document(&mut self, _page: Size) {
        self.runs.clear();
        self.accents.clear();
        self.output = None;
    }

    fn place_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        self.pen = style.pen_after(at, text);
        if !text.is_empty() {
            self.runs.push(Run {
                at,
                text: text.to_string(),
                anchor: style.anchor,
            });
        }
    }

    fn draw_rect(&mut self, at: Point, size: Size, tone: Tone, _filled: bool) {
        if tone == Tone::Accent {
            self.accents.push((at, size));
        }
    }

    fn draw_line(&mut self, _from: Point, _to: Point) {}

    fn draw_marker(&mut self, _center: Point, _radius: f64, _filled: bool) {}

    fn current_position(&self) -> Point {
        self.pen
    }

    fn end_document(&mut self) {
        self.output = Some(self.compose());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Rows
// ═══════════════════════════════════════════════════════════════════════

/// Baseline → row index mapping, sorted by baseline.
struct Rows(Vec<(f64, usize)>);

impl Rows {
    fn cluster(mut baselines: Vec<f64>, cell_height: f64) -> Self {
        baselines.sort_by(f64::total_cmp);
        let mut rows: Vec<(f64, usize)> = Vec::new();
        for y in baselines {
            match rows.last() {
                None => rows.push((y, 0)),
                Some(&(base, index)) => {
                    let gap = y - base;
                    if gap >= cell_height / 2.0 {
                        let step = ((gap / cell_height).round() as usize).max(1);
                        rows.push((y, index + step));
                    }
                }
            }
        }
        Self(rows)
    }

    /// Row of the last baseline at or above `y`.
    fn row_of(&self, y: f64) -> usize {
        self.0
            .iter()
            .take_while(|(base, _)| *base <= y + 1e-6)
            .last()
            .or_else(|| self.0.first())
            .map_or(0, |&(_, index)| index)
    }

    /// Rows whose baseline falls in `[top, bottom)`.
    fn within(&self, top: f64, bottom: f64) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .filter(move |(base, _)| *base >= top && *base < bottom)
            .map(|&(_, index)| index)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Grid
// ═══════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    fn cells(&mut self, row: usize, width: usize) -> &mut Vec<char> {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() < width {
            cells.resize(width, ' ');
        }
        cells
    }

    fn write(&mut self, row: usize, col: usize, chars: &[char]) {
        let cells = self.cells(row, col + chars.len());
        cells[col..col + chars.len()].copy_from_slice(chars);
    }

    /// Fill only the blank cells of `cols`.
    fn fill(&mut self, row: usize, cols: std::ops::Range<usize>, ch: char) {
        let cells = self.cells(row, cols.end);
        for cell in &mut cells[cols] {
            if *cell == ' ' {
                *cell = ch;
            }
        }
    }

    fn render(self) -> String {
        let mut lines: Vec<String> = self
            .rows
            .into_iter()
            .map(|cells| cells.into_iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return String::new();
        }

        let indent = lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| line.len() - line.trim_start().len())
            .min()
            .unwrap_or(0);

        let mut out = String::new();
        for line in &lines {
            out.push_str(line.get(indent..).unwrap_or(""));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{render_song_to_text, FontFace, RenderOptions};
    use crate::model::{Node, Segment, Song};

    fn surface() -> TextSurface {
        TextSurface::new(Size::new(10.0, 20.0))
    }

    fn regular() -> TextStyle {
        TextStyle::new(10.0, FontFace::Regular)
    }

    #[test]
    fn runs_snap_to_cells() {
        let mut text = surface();
        text.begin_document(Size::new(500.0, 500.0));
        text.place_text(Point::new(100.0, 40.0), "ab", &regular());
        text.place_text(Point::new(140.0, 42.0), "cd", &regular());
        text.place_text(Point::new(100.0, 80.0), "ef", &regular());
        text.end_document();
        assert_eq!(text.into_string(), "ab  cd\n\nef\n");
    }

    #[test]
    fn centered_runs_straddle_their_anchor() {
        let mut text = surface();
        text.place_text(Point::new(0.0, 20.0), "x", &regular());
        text.place_text(Point::new(50.0, 20.0), "abcd", &regular().anchor(Anchor::Middle));
        text.end_document();
        assert_eq!(text.into_string(), "x  abcd\n");
    }

    #[test]
    fn accents_become_bars_and_rules() {
        let mut text = surface();
        text.place_text(Point::new(10.0, 20.0), "T", &regular());
        text.draw_rect(Point::new(10.0, 33.0), Size::new(40.0, 7.0), Tone::Accent, true);
        text.place_text(Point::new(20.0, 60.0), "a", &regular());
        text.place_text(Point::new(20.0, 80.0), "b", &regular());
        text.draw_rect(Point::new(10.0, 50.0), Size::new(5.0, 35.0), Tone::Accent, true);
        text.draw_rect(Point::new(10.0, 50.0), Size::new(5.0, 35.0), Tone::Ink, true);
        text.end_document();
        assert_eq!(text.into_string(), "T\n====\n|a\n|b\n");
    }

    #[test]
    fn empty_surface_renders_nothing() {
        let mut text = surface();
        text.end_document();
        assert_eq!(text.into_string(), "");
    }

    #[test]
    fn chord_sits_over_its_syllable() {
        let song = Song {
            children: vec![Node::verse(vec![Node::line(vec![
                Segment::plain("Hello "),
                Segment::chorded("C", "world"),
            ])])],
            ..Song::default()
        };
        let out = render_song_to_text(&song, &RenderOptions::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        let lyric = lines.iter().position(|l| l.starts_with("Hello world")).unwrap();
        let chord_line = lines[lyric - 1];
        assert_eq!(chord_line.find('C'), Some("Hello ".len()));
    }
}
