//! Line classifier — turns one raw markup line into a blank, a directive or
//! a lyric line split into chord/text segments.

use serde::{Deserialize, Serialize};

use crate::model::Segment;

/// One input line after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    Blank,
    /// `{key:value}`, both kept verbatim; value empty without a colon
    Directive { key: String, value: String },
    /// Lyric text with chords, in markup order
    Lyric(Vec<Segment>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// Treat lines starting with `#` as blank
    pub skip_hash_comments: bool,
}

/// Classify a line with default options.
pub fn classify(raw: &str) -> ClassifiedLine {
    classify_with(raw, &ClassifyOptions::default())
}

pub fn classify_with(raw: &str, options: &ClassifyOptions) -> ClassifiedLine {
    let line = raw.trim();
    if line.is_empty() || (options.skip_hash_comments && line.starts_with('#')) {
        return ClassifiedLine::Blank;
    }

    // Only the outermost pair of braces is syntactically meaningful.
    if line.len() >= 2 && line.starts_with('{') && line.ends_with('}') {
        let inner = &line[1..line.len() - 1];
        let (key, value) = inner.split_once(':').unwrap_or((inner, ""));
        return ClassifiedLine::Directive {
            key: key.to_string(),
            value: value.to_string(),
        };
    }

    ClassifiedLine::Lyric(split_segments(line))
}

/// Split lyric text at `[chord]` tokens.
///
/// Text before the first chord becomes a chord-less leading segment. A chord
/// name runs from `[` to the next `]`; an empty `[]` or a `[` that is never
/// closed stays in the text.
///
/// ```text
/// "This is [Dm]an example [C]line."
///   -> (None, "This is "), ("Dm", "an example "), ("C", "line.")
/// ```
pub fn split_segments(line: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chord: Option<&str> = None;
    let mut text = String::new();
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(0) | None => {
                // Literal bracket; keep scanning after it.
                text.push_str(&rest[..=open]);
                rest = after;
            }
            Some(close) => {
                text.push_str(&rest[..open]);
                if chord.is_some() || !text.is_empty() {
                    segments.push(Segment::new(chord, std::mem::take(&mut text)));
                }
                chord = Some(&after[..close]);
                rest = &after[close + 1..];
            }
        }
    }
    text.push_str(rest);

    if chord.is_some() || !text.is_empty() || segments.is_empty() {
        segments.push(Segment::new(chord, text));
    }
    segments
}
