//! Data model for a parsed song sheet.
//!
//! A song is an ordered list of verses and choruses plus title metadata and
//! the chord shapes the document defines for itself. The tree is built once
//! by the parser and only read afterwards.

use serde::{Deserialize, Serialize};

use crate::chords::ChordTable;

/// A complete song parsed from ChordPro-style markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Title of the song
    pub title: Option<String>,
    /// Subtitle (artist, album, tuning note...)
    pub subtitle: Option<String>,
    /// Top-level sections, always `Node::Verse` or `Node::Chorus`
    pub children: Vec<Node>,
    /// Chord shapes defined by the document itself via `{define: ...}`
    pub chords: ChordTable,
}

/// One piece of a lyric line: a chord label and the text it sits above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Chord anchored at the start of `text`, if any
    pub chord: Option<String>,
    /// Lyric text following the chord (may be empty)
    pub text: String,
}

/// An element of the document tree.
///
/// Verses and choruses own `Line` and `Comment` children only; the parser
/// never nests sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Line {
        segments: Vec<Segment>,
        /// Body font size taking effect from this node on
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<u32>,
    },
    Comment {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<u32>,
    },
    Verse {
        children: Vec<Node>,
        /// Body font size taking effect where the section starts
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<u32>,
    },
    Chorus {
        children: Vec<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<u32>,
    },
}

impl Segment {
    pub fn new(chord: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            chord: chord.map(String::from),
            text: text.into(),
        }
    }

    /// A segment without a chord.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(None, text)
    }

    pub fn chorded(chord: &str, text: impl Into<String>) -> Self {
        Self::new(Some(chord), text)
    }
}

impl Node {
    pub fn line(segments: Vec<Segment>) -> Self {
        Node::Line {
            segments,
            font_size: None,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Node::Comment {
            text: text.into(),
            font_size: None,
        }
    }

    pub fn verse(children: Vec<Node>) -> Self {
        Node::Verse {
            children,
            font_size: None,
        }
    }

    pub fn chorus(children: Vec<Node>) -> Self {
        Node::Chorus {
            children,
            font_size: None,
        }
    }

    /// The same node with a font size hint attached.
    pub fn with_font_size(mut self, size: u32) -> Self {
        match &mut self {
            Node::Line { font_size, .. }
            | Node::Comment { font_size, .. }
            | Node::Verse { font_size, .. }
            | Node::Chorus { font_size, .. } => *font_size = Some(size),
        }
        self
    }

    /// Children of a section node; empty for lines and comments.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Verse { children, .. } | Node::Chorus { children, .. } => children,
            Node::Line { .. } | Node::Comment { .. } => &[],
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Node::Verse { .. } | Node::Chorus { .. })
    }
}

impl Song {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lyric lines across all sections.
    pub fn line_count(&self) -> usize {
        self.children
            .iter()
            .flat_map(|section| section.children())
            .filter(|node| matches!(node, Node::Line { .. }))
            .count()
    }

    /// Distinct chord labels in lyric order, as they appear in the markup.
    pub fn chord_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for node in self.children.iter().flat_map(|section| section.children()) {
            if let Node::Line { segments, .. } = node {
                for chord in segments.iter().filter_map(|s| s.chord.as_deref()) {
                    if !names.contains(&chord) {
                        names.push(chord);
                    }
                }
            }
        }
        names
    }
}
