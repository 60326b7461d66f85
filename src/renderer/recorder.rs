//! Recording surface — keeps every drawing call as a [`DrawOp`].
//!
//! Useful for checking layout positions without parsing SVG, and for dumping
//! a render as JSON.

use serde::Serialize;

use super::{Point, Size, Surface, TextStyle, Tone};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    BeginDocument {
        page: Size,
    },
    Text {
        at: Point,
        text: String,
        style: TextStyle,
    },
    Rect {
        at: Point,
        size: Size,
        tone: Tone,
        filled: bool,
    },
    Line {
        from: Point,
        to: Point,
    },
    Marker {
        center: Point,
        radius: f64,
        filled: bool,
    },
    EndDocument,
}

#[derive(Debug, Default)]
pub struct Recorder {
    ops: Vec<DrawOp>,
    pen: Point,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Recorded operations as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.ops)?)
    }
}

impl Surface for Recorder {
    fn begin_document(&mut self, page: Size) {
        self.ops.push(DrawOp::BeginDocument { page });
    }

    fn place_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        self.pen = style.pen_after(at, text);
        self.ops.push(DrawOp::Text {
            at,
            text: text.to_string(),
            style: *style,
        });
    }

    fn draw_rect(&mut self, at: Point, size: Size, tone: Tone, filled: bool) {
        self.ops.push(DrawOp::Rect {
            at,
            size,
            tone,
            filled,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.ops.push(DrawOp::Line { from, to });
    }

    fn draw_marker(&mut self, center: Point, radius: f64, filled: bool) {
        self.ops.push(DrawOp::Marker {
            center,
            radius,
            filled,
        });
    }

    fn current_position(&self) -> Point {
        self.pen
    }

    fn end_document(&mut self) {
        self.ops.push(DrawOp::EndDocument);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FontFace;

    #[test]
    fn pen_follows_placed_text() {
        let mut recorder = Recorder::new();
        let style = TextStyle::new(10.0, FontFace::Regular);
        recorder.place_text(Point::new(5.0, 20.0), "abcd", &style);
        assert_eq!(recorder.current_position(), Point::new(5.0 + 4.0 * style.char_width(), 20.0));
    }

    #[test]
    fn json_dump_is_tagged_by_op() {
        let mut recorder = Recorder::new();
        recorder.begin_document(Size::new(100.0, 200.0));
        recorder.draw_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        recorder.end_document();

        let json: serde_json::Value = serde_json::from_str(&recorder.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["op"], "begin_document");
        assert_eq!(json[0]["page"]["width"], 100.0);
        assert_eq!(json[1]["op"], "line");
        assert_eq!(json[2]["op"], "end_document");
    }
}
