//! Shared constants for the sheet renderer (all in points, y growing downward).

pub(super) const CM: f64 = 72.0 / 2.54;

// ── Page & margins ──────────────────────────────────────────────────
pub(super) const A4_WIDTH: f64 = 595.28;
pub(super) const A4_HEIGHT: f64 = 841.89;
pub(super) const PAGE_MARGIN_SIDE: f64 = 2.0 * CM;
pub(super) const PAGE_MARGIN_TOP: f64 = 1.5 * CM;
pub(super) const PAGE_MARGIN_BOTTOM: f64 = 1.5 * CM;

// ── Text metrics ────────────────────────────────────────────────────
pub(super) const DEFAULT_FONT_SIZE: f64 = 14.0;
pub(super) const LEADING_FACTOR: f64 = 1.2; // line height per point of font size
pub(super) const CHAR_WIDTH_FACTOR: f64 = 0.55; // nominal glyph advance per point
pub(super) const CHORD_SIZE_DELTA: f64 = 2.0; // chords are set this much smaller

// ── Title block ─────────────────────────────────────────────────────
pub(super) const TITLE_OFFSET: f64 = 20.0; // title baseline below the top margin
pub(super) const TITLE_FONT_SIZE: f64 = 20.0;
pub(super) const SUBTITLE_FONT_SIZE: f64 = 14.0;
pub(super) const RULE_HEIGHT: f64 = 7.0;

// ── Sections ────────────────────────────────────────────────────────
pub(super) const COMMENT_PAD_BELOW: f64 = 5.0;
pub(super) const CHORUS_BAR_RISE: f64 = 3.0; // bar top sits this far below the cap height

// ── Chord diagrams ──────────────────────────────────────────────────
pub(super) const DIAGRAM_WIDTH: f64 = 0.8 * CM;
pub(super) const DIAGRAM_HEIGHT: f64 = 1.0 * CM;
pub(super) const DIAGRAM_COLUMN_INSET: f64 = 1.15 * CM; // from the right margin
pub(super) const DIAGRAM_COLUMN_DROP: f64 = 0.48 * CM; // below the lyrics anchor
pub(super) const DIAGRAM_LABEL_SIZE: f64 = 12.0;
pub(super) const FRET_ROWS: usize = 4;
pub(super) const BASE_FRET_LABEL_SIZE: f64 = 9.0;
pub(super) const BASE_FRET_GAP: f64 = 2.0; // right of the grid

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const INK_COLOR: &str = "#1a1a1a";
pub(super) const MUTED_COLOR: &str = "#808080";
pub(super) const CHORD_COLOR: &str = "#4a4a9a";
pub(super) const PAPER_COLOR: &str = "white";
pub(super) const ACCENT_COLOR: &str = "#87ceeb";
pub(super) const GRID_LINE_WIDTH: f64 = 0.8;
