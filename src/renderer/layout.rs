//! Layout engine — walks the song tree once and places every element.
//!
//! The cursor only moves down. Its y is the baseline of the next line to be
//! written; its left edge shifts inward while a chorus is open.

use std::collections::HashSet;

use super::constants::*;
use super::{FontFace, PageSetup, Point, Size, Surface, TextStyle, Tone};
use crate::model::{Node, Segment, Song};

struct Cursor {
    left: f64,
    y: f64,
}

/// What the diagram pass needs once layout is done.
pub(super) struct LayoutSummary {
    /// Vertical anchor of the diagram column, just below the title block
    pub(super) diagram_anchor: f64,
    /// Chords placed above lyrics, in first-seen order
    pub(super) chords: Vec<String>,
}

pub(super) struct LayoutEngine<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    page: &'a PageSetup,
    font_size: f64,
    cursor: Cursor,
    in_chorus: bool,
    /// Whether the last emitted line carried text; blank markers collapse otherwise
    text_on_last_line: bool,
    diagram_anchor: f64,
    chords: Vec<String>,
    seen: HashSet<String>,
}

impl<'a, S: Surface + ?Sized> LayoutEngine<'a, S> {
    pub(super) fn new(surface: &'a mut S, page: &'a PageSetup, font_size: f64) -> Self {
        Self {
            surface,
            page,
            font_size,
            cursor: Cursor {
                left: page.margin_left,
                y: page.margin_top,
            },
            in_chorus: false,
            text_on_last_line: false,
            diagram_anchor: page.margin_top,
            chords: Vec::new(),
            seen: HashSet::new(),
        }
    }

    // ── Styles ──────────────────────────────────────────────────────

    fn body_style(&self) -> TextStyle {
        let face = if self.in_chorus {
            FontFace::Bold
        } else {
            FontFace::Regular
        };
        TextStyle::new(self.font_size, face)
    }

    fn chord_style(&self) -> TextStyle {
        TextStyle::new((self.font_size - CHORD_SIZE_DELTA).max(1.0), FontFace::Oblique)
            .tone(Tone::Chord)
    }

    fn comment_style(&self) -> TextStyle {
        TextStyle::new(self.font_size, FontFace::Bold).tone(Tone::Paper)
    }

    fn line_height(&self) -> f64 {
        self.body_style().line_height()
    }

    fn apply_font_size(&mut self, font_size: Option<u32>) {
        if let Some(size) = font_size {
            self.font_size = f64::from(size);
        }
    }

    // ── Title block ─────────────────────────────────────────────────

    /// Title, muted subtitle and an accent rule; then the lyrics cursor
    /// starts one body line below the remembered diagram anchor.
    pub(super) fn title_block(&mut self, song: &Song) {
        let left = self.page.margin_left;
        let title_style = TextStyle::new(TITLE_FONT_SIZE, FontFace::Bold);
        let subtitle_style = TextStyle::new(SUBTITLE_FONT_SIZE, FontFace::Oblique).tone(Tone::Muted);
        let step = subtitle_style.line_height();

        let mut y = self.page.margin_top + TITLE_OFFSET;
        if let Some(title) = song.title.as_deref().filter(|t| !t.is_empty()) {
            self.surface.place_text(Point::new(left, y), title, &title_style);
        }
        y += step;
        if let Some(subtitle) = song.subtitle.as_deref().filter(|t| !t.is_empty()) {
            self.surface.place_text(Point::new(left, y), subtitle, &subtitle_style);
        }
        y += step;
        self.surface.draw_rect(
            Point::new(left, y - RULE_HEIGHT),
            Size::new(self.page.right_edge() - left, RULE_HEIGHT),
            Tone::Accent,
            true,
        );
        y += step;

        self.diagram_anchor = y;
        self.cursor = Cursor {
            left,
            y: y + self.line_height(),
        };
        self.text_on_last_line = false;
    }

    // ── Nodes ───────────────────────────────────────────────────────

    pub(super) fn node(&mut self, node: &Node) {
        match node {
            Node::Line {
                segments,
                font_size,
            } => {
                self.apply_font_size(*font_size);
                self.line(segments);
            }
            Node::Comment { text, font_size } => {
                self.apply_font_size(*font_size);
                self.comment(text);
            }
            Node::Verse {
                children,
                font_size,
            } => {
                self.apply_font_size(*font_size);
                self.paragraph_break();
                for child in children {
                    self.node(child);
                }
            }
            Node::Chorus {
                children,
                font_size,
            } => {
                self.apply_font_size(*font_size);
                self.paragraph_break();
                self.chorus_scope(|engine| {
                    for child in children {
                        engine.node(child);
                    }
                });
            }
        }
    }

    /// Advance one line unless the previous line was already a gap.
    fn paragraph_break(&mut self) {
        if self.text_on_last_line {
            self.cursor.y += self.line_height();
            self.text_on_last_line = false;
        }
    }

    fn line(&mut self, segments: &[Segment]) {
        if segments.iter().all(|s| s.text.is_empty()) {
            self.paragraph_break();
            return;
        }

        let line_height = self.line_height();
        if segments.iter().any(|s| s.chord.is_some()) {
            // Room for the chord labels above the text.
            self.cursor.y += line_height;
        }

        let body = self.body_style();
        let chord_style = self.chord_style();
        let mut at = Point::new(self.cursor.left, self.cursor.y);
        for segment in segments {
            self.surface.place_text(at, &segment.text, &body);
            if let Some(chord) = &segment.chord {
                let label_at = Point::new(at.x, at.y - line_height);
                self.surface.place_text(label_at, chord, &chord_style);
                self.record_chord(chord);
            }
            at = self.surface.current_position();
        }

        self.cursor.y += line_height;
        self.text_on_last_line = true;
    }

    fn record_chord(&mut self, chord: &str) {
        if self.seen.insert(chord.to_string()) {
            self.chords.push(chord.to_string());
        }
    }

    /// Inverted callout: an ink box behind paper-colored text.
    fn comment(&mut self, text: &str) {
        let style = self.comment_style();
        let padded = format!(" {text} ");
        let at = Point::new(self.cursor.left, self.cursor.y);

        self.surface.draw_rect(
            Point::new(at.x, at.y - style.size),
            Size::new(style.text_width(&padded), style.size + COMMENT_PAD_BELOW),
            Tone::Ink,
            true,
        );
        self.surface.place_text(at, &padded, &style);

        self.cursor.y += self.line_height();
        self.text_on_last_line = true;
    }

    /// Indent and embolden everything rendered by `render`, then restore the
    /// margin and face and mark the covered span with a bar in the gutter.
    fn chorus_scope(&mut self, render: impl FnOnce(&mut Self)) {
        let indent = self.body_style().char_width();
        let bar_rise = self.font_size - CHORUS_BAR_RISE;
        let saved_left = self.cursor.left;
        let saved_in_chorus = self.in_chorus;
        let top = self.cursor.y;

        self.cursor.left += indent;
        self.in_chorus = true;
        render(self);
        self.cursor.left = saved_left;
        self.in_chorus = saved_in_chorus;

        let bottom = self.cursor.y;
        if bottom > top {
            self.surface.draw_rect(
                Point::new(saved_left, top - bar_rise),
                Size::new(indent / 2.0, bottom - top),
                Tone::Accent,
                true,
            );
        }
    }

    pub(super) fn finish(self) -> LayoutSummary {
        LayoutSummary {
            diagram_anchor: self.diagram_anchor,
            chords: self.chords,
        }
    }
}
