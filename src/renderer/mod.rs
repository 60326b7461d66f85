//! Sheet renderer — lays a parsed Song out on a drawing surface.
//!
//! Layout is a single forward pass over the document tree: a text cursor
//! moves down the page placing lyric lines with their chord labels, comment
//! callouts and chorus highlights. Once the last section is placed, a
//! fretboard diagram is drawn for every chord that appeared above lyrics.
//!
//! Drawing goes through the [`Surface`] trait so the same layout can produce
//! SVG ([`SvgBuilder`]), a plain-text approximation ([`TextSurface`]) or a
//! list of recorded operations ([`Recorder`]).

mod constants;
mod diagrams;
mod layout;
pub mod recorder;
pub mod svg_builder;
pub mod text_grid;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chords::ChordTable;
use crate::error::Result;
use crate::model::Song;
use constants::*;
use layout::LayoutEngine;

pub use recorder::{DrawOp, Recorder};
pub use svg_builder::SvgBuilder;
pub use text_grid::TextSurface;

// ═══════════════════════════════════════════════════════════════════════
// Geometry & style
// ═══════════════════════════════════════════════════════════════════════

/// A position in points, y growing downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
}

/// Semantic colors; each surface maps them to whatever it can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Ink,
    Muted,
    Chord,
    /// Light text set on an ink background
    Paper,
    /// Highlight for the title rule and chorus bars
    Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size: f64,
    pub face: FontFace,
    pub tone: Tone,
    pub anchor: Anchor,
}

impl TextStyle {
    pub fn new(size: f64, face: FontFace) -> Self {
        Self {
            size,
            face,
            tone: Tone::Ink,
            anchor: Anchor::Start,
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Nominal advance of one character.
    pub fn char_width(&self) -> f64 {
        self.size * CHAR_WIDTH_FACTOR
    }

    pub fn line_height(&self) -> f64 {
        self.size * LEADING_FACTOR
    }

    /// Estimate the rendered width of a text run.
    pub fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width()
    }

    /// Where the pen rests after placing `text` at `at`.
    pub fn pen_after(&self, at: Point, text: &str) -> Point {
        let width = self.text_width(text);
        match self.anchor {
            Anchor::Start => Point::new(at.x + width, at.y),
            Anchor::Middle => Point::new(at.x + width / 2.0, at.y),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Surface
// ═══════════════════════════════════════════════════════════════════════

/// Drawing capabilities the layout engine needs from an output target.
pub trait Surface {
    fn begin_document(&mut self, page: Size);

    /// Place a text run with its baseline at `at.y`. Moves the pen to the
    /// end of the run.
    fn place_text(&mut self, at: Point, text: &str, style: &TextStyle);

    /// Rectangle with its top-left corner at `at`.
    fn draw_rect(&mut self, at: Point, size: Size, tone: Tone, filled: bool);

    /// Fretboard grid line.
    fn draw_line(&mut self, from: Point, to: Point);

    /// Fretboard finger marker; open strings are drawn unfilled.
    fn draw_marker(&mut self, center: Point, radius: f64, filled: bool);

    /// Pen position after the last placed text run.
    fn current_position(&self) -> Point;

    fn end_document(&mut self);
}

// ═══════════════════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════════════════

/// Page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSetup {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageSetup {
    pub fn a4() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin_left: PAGE_MARGIN_SIDE,
            margin_right: PAGE_MARGIN_SIDE,
            margin_top: PAGE_MARGIN_TOP,
            margin_bottom: PAGE_MARGIN_BOTTOM,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// x of the right margin.
    pub fn right_edge(&self) -> f64 {
        self.width - self.margin_right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub page: PageSetup,
    /// Body font size until a `fontsize` hint changes it
    pub font_size: f64,
    /// Default chord shapes; a song's own definitions take precedence
    pub chords: ChordTable,
}

impl RenderOptions {
    /// Body size before any `fontsize` hint.
    pub const DEFAULT_FONT_SIZE: f64 = DEFAULT_FONT_SIZE;
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page: PageSetup::a4(),
            font_size: DEFAULT_FONT_SIZE,
            chords: ChordTable::ukulele(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Lay out `song` on `surface`, chord diagrams included.
///
/// Fails with `Error::UndefinedChord` before any diagram is drawn if a chord
/// used in the lyrics has no shape in the song or in `options.chords`.
pub fn render_song<S: Surface + ?Sized>(
    song: &Song,
    options: &RenderOptions,
    surface: &mut S,
) -> Result<()> {
    surface.begin_document(options.page.size());

    let mut engine = LayoutEngine::new(surface, &options.page, options.font_size);
    engine.title_block(song);
    for node in &song.children {
        engine.node(node);
    }
    let summary = engine.finish();

    let lookup = options.chords.overlay(&song.chords);
    let shapes = diagrams::resolve(&summary.chords, lookup)?;
    debug!(diagrams = shapes.len(), "drawing chord diagrams");
    diagrams::draw(surface, &options.page, summary.diagram_anchor, &shapes);

    surface.end_document();
    Ok(())
}

/// Render a song into a complete SVG string.
pub fn render_song_to_svg(song: &Song, options: &RenderOptions) -> Result<String> {
    let mut svg = SvgBuilder::new();
    render_song(song, options, &mut svg)?;
    Ok(svg.build())
}

/// Render a song as a plain-text chord sheet.
pub fn render_song_to_text(song: &Song, options: &RenderOptions) -> Result<String> {
    let mut text = TextSurface::for_font_size(options.font_size);
    render_song(song, options, &mut text)?;
    Ok(text.into_string())
}

/// Record the drawing operations a render would perform.
pub fn record_song(song: &Song, options: &RenderOptions) -> Result<Vec<DrawOp>> {
    let mut recorder = Recorder::new();
    render_song(song, options, &mut recorder)?;
    Ok(recorder.into_ops())
}
