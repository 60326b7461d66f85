//! SVG builder — accumulates SVG elements and produces the final string.
//!
//! The document is one continuous page: if the content runs past the page
//! height the SVG simply grows taller.

use super::constants::*;
use super::{Anchor, FontFace, Point, Size, Surface, TextStyle, Tone};

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
    /// Lowest y reached by any element
    extent: f64,
    pen: Point,
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            width: A4_WIDTH,
            height: A4_HEIGHT,
            extent: 0.0,
            pen: Point::default(),
        }
    }

    pub fn build(self) -> String {
        let height = self.height.max(self.extent + PAGE_MARGIN_BOTTOM);
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.2} {:.2}" width="{:.2}" height="{:.2}" style="font-family: Helvetica, Arial, sans-serif;">"#,
            self.width, height, self.width, height
        );
        svg.push('\n');
        svg.push_str(&format!(
            r#"  <rect x="0" y="0" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            self.width, height, PAPER_COLOR
        ));
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn reach(&mut self, y: f64) {
        self.extent = self.extent.max(y);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.reach(y1.max(y2));
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            x1, y1, x2, y2, color, width
        ));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: &str, stroke_width: f64) {
        self.reach(y + h);
        if stroke_width > 0.0 {
            self.elements.push(format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="{}" stroke-width="{:.1}"/>"#,
                x, y, w, h, fill, stroke, stroke_width
            ));
        } else {
            self.elements.push(format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                x, y, w, h, fill
            ));
        }
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: &str) {
        self.reach(cy + r);
        self.elements.push(format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" stroke="{}" stroke-width="{:.1}"/>"#,
            cx, cy, r, fill, stroke, GRID_LINE_WIDTH
        ));
    }

    fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.reach(y + style.size * 0.25);
        let weight = match style.face {
            FontFace::Bold => "bold",
            FontFace::Regular | FontFace::Oblique => "normal",
        };
        let font_style = match style.face {
            FontFace::Oblique => "italic",
            FontFace::Regular | FontFace::Bold => "normal",
        };
        let anchor = match style.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
        };
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" font-weight="{}" font-style="{}" fill="{}" text-anchor="{}" xml:space="preserve">{}</text>"#,
            x,
            y,
            style.size,
            weight,
            font_style,
            tone_color(style.tone),
            anchor,
            escape(content)
        ));
    }
}

fn tone_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Ink => INK_COLOR,
        Tone::Muted => MUTED_COLOR,
        Tone::Chord => CHORD_COLOR,
        Tone::Paper => PAPER_COLOR,
        Tone::Accent => ACCENT_COLOR,
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Surface for SvgBuilder {
    fn begin_document(&mut self, page: Size) {
        self.width = page.width;
        self.height = page.height;
    }

    fn place_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        self.pen = style.pen_after(at, text);
        if !text.is_empty() {
            self.text(at.x, at.y, text, style);
        }
    }

    fn draw_rect(&mut self, at: Point, size: Size, tone: Tone, filled: bool) {
        let color = tone_color(tone);
        if filled {
            self.rect(at.x, at.y, size.width, size.height, color, "none", 0.0);
        } else {
            self.rect(at.x, at.y, size.width, size.height, "none", color, GRID_LINE_WIDTH);
        }
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.line(from.x, from.y, to.x, to.y, INK_COLOR, GRID_LINE_WIDTH);
    }

    fn draw_marker(&mut self, center: Point, radius: f64, filled: bool) {
        if filled {
            self.circle(center.x, center.y, radius, INK_COLOR, "none");
        } else {
            self.circle(center.x, center.y, radius, "none", INK_COLOR);
        }
    }

    fn current_position(&self) -> Point {
        self.pen
    }

    fn end_document(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped() {
        let mut svg = SvgBuilder::new();
        svg.place_text(
            Point::new(10.0, 20.0),
            "Rock & <Roll>",
            &TextStyle::new(14.0, FontFace::Bold),
        );
        let out = svg.build();
        assert!(out.contains("Rock &amp; &lt;Roll&gt;"));
        assert!(out.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn empty_text_moves_nothing_but_is_not_emitted() {
        let mut svg = SvgBuilder::new();
        svg.place_text(Point::new(10.0, 20.0), "", &TextStyle::new(14.0, FontFace::Regular));
        assert_eq!(svg.current_position(), Point::new(10.0, 20.0));
        assert!(!svg.build().contains("<text"));
    }

    #[test]
    fn grows_past_the_page_height() {
        let mut svg = SvgBuilder::new();
        svg.begin_document(Size::new(200.0, 100.0));
        svg.draw_line(Point::new(0.0, 0.0), Point::new(0.0, 500.0));
        svg.end_document();
        let out = svg.build();
        let expected = format!(r#"height="{:.2}""#, 500.0 + PAGE_MARGIN_BOTTOM);
        assert!(out.contains(&expected), "{out}");
    }

    #[test]
    fn markers_are_filled_or_open() {
        let mut svg = SvgBuilder::new();
        svg.draw_marker(Point::new(1.0, 1.0), 2.0, true);
        svg.draw_marker(Point::new(5.0, 1.0), 2.0, false);
        let out = svg.build();
        assert!(out.contains(&format!(r#"fill="{INK_COLOR}" stroke="none""#)));
        assert!(out.contains(&format!(r#"fill="none" stroke="{INK_COLOR}""#)));
    }
}
