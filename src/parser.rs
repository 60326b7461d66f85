//! Section parser — groups classified lines into verses and choruses.
//!
//! Lyric lines at top level are collected into an auto-grouped verse that
//! runs until a blank line, a chorus boundary or the end of input. Choruses
//! are opened and closed explicitly and never nest, so the open-section
//! state is at most one level deep.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chords::{ChordTable, MAX_FRET};
use crate::classify::{classify_with, ClassifiedLine, ClassifyOptions};
use crate::error::{DefinitionError, Error, Result, StructureError};
use crate::model::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Highest fret a `{define}` may use
    pub max_fret: u32,
    /// Strings per chord shape; `None` accepts any consistent count
    pub strings: Option<usize>,
    pub classify: ClassifyOptions,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_fret: MAX_FRET,
            strings: ChordTable::ukulele().string_count(),
            classify: ClassifyOptions::default(),
        }
    }
}

/// Parse a whole markup document.
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<Song> {
    parse_lines(text.lines(), options)
}

/// Classify and parse raw lines (trailing newlines already stripped).
pub fn parse_lines<I, S>(lines: I, options: &ParseOptions) -> Result<Song>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse(
        lines
            .into_iter()
            .map(|line| classify_with(line.as_ref(), &options.classify)),
        options,
    )
}

/// Build the document tree from classified lines.
pub fn parse<I>(lines: I, options: &ParseOptions) -> Result<Song>
where
    I: IntoIterator<Item = ClassifiedLine>,
{
    let mut parser = SectionParser::new(options);
    for (idx, line) in lines.into_iter().enumerate() {
        parser.feed(idx + 1, line)?;
    }
    parser.finish()
}

// ─── Section state machine ───────────────────────────────────────────

/// The section being filled. A font size hint pending when it opened
/// belongs to the section itself, so its spacing and indent use it too.
enum OpenSection {
    Verse {
        font_size: Option<u32>,
        children: Vec<Node>,
    },
    Chorus {
        opened_at: usize,
        font_size: Option<u32>,
        children: Vec<Node>,
    },
}

struct SectionParser<'a> {
    options: &'a ParseOptions,
    song: Song,
    open: Option<OpenSection>,
    pending_font_size: Option<u32>,
    last_line: usize,
}

impl<'a> SectionParser<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            song: Song::new(),
            open: None,
            pending_font_size: None,
            last_line: 0,
        }
    }

    fn feed(&mut self, line: usize, classified: ClassifiedLine) -> Result<()> {
        self.last_line = line;
        match classified {
            ClassifiedLine::Blank => self.blank(),
            ClassifiedLine::Lyric(segments) => {
                self.push_content(|font_size| Node::Line { segments, font_size });
            }
            ClassifiedLine::Directive { key, value } => self.directive(line, &key, &value)?,
        }
        Ok(())
    }

    fn blank(&mut self) {
        match &mut self.open {
            Some(OpenSection::Verse { .. }) => self.close_verse(),
            // Keep the paragraph break; layout collapses repeated ones.
            Some(OpenSection::Chorus { children, .. }) => children.push(Node::line(Vec::new())),
            None => {}
        }
    }

    fn directive(&mut self, line: usize, key: &str, value: &str) -> Result<()> {
        match key.trim() {
            "title" => self.song.title = Some(value.trim().to_string()),
            "subtitle" => self.song.subtitle = Some(value.trim().to_string()),
            "comment" => {
                let text = value.trim().to_string();
                self.push_content(|font_size| Node::Comment { text, font_size });
            }
            "start_of_chorus" | "start-of-chorus" | "soc" => self.open_chorus(line)?,
            "end_of_chorus" | "end-of-chorus" | "eoc" => self.close_chorus(line)?,
            "define" => {
                let (name, frets) =
                    parse_chord_definition(value, self.options.max_fret, self.options.strings)
                        .map_err(|source| Error::Definition { line, source })?;
                if self.song.chords.insert(name.as_str(), frets).is_some() {
                    debug!(line, chord = %name, "chord redefined");
                }
            }
            "fontsize" => {
                let size = value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|&size| size > 0)
                    .ok_or_else(|| Error::InvalidFontSize {
                        line,
                        value: value.to_string(),
                    })?;
                self.pending_font_size = Some(size);
            }
            other => {
                return Err(Error::UnknownCommand {
                    line,
                    key: other.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Append a line or comment to the open section, opening a verse if
    /// needed. `build` receives the font size hint left for the node.
    fn push_content(&mut self, build: impl FnOnce(Option<u32>) -> Node) {
        if self.open.is_none() {
            debug!(line = self.last_line, "verse opened");
            self.open = Some(OpenSection::Verse {
                font_size: self.pending_font_size.take(),
                children: Vec::new(),
            });
        }
        let node = build(self.pending_font_size.take());
        if let Some(OpenSection::Verse { children, .. } | OpenSection::Chorus { children, .. }) =
            &mut self.open
        {
            children.push(node);
        }
    }

    fn close_verse(&mut self) {
        if let Some(OpenSection::Verse {
            font_size,
            children,
        }) = self.open.take()
        {
            debug!(line = self.last_line, lines = children.len(), "verse closed");
            self.song.children.push(Node::Verse {
                children,
                font_size,
            });
        }
    }

    fn open_chorus(&mut self, line: usize) -> Result<()> {
        if let Some(OpenSection::Chorus { opened_at, .. }) = self.open {
            return Err(Error::Structure {
                line,
                kind: StructureError::NestedChorus { opened_at },
            });
        }
        self.close_verse();
        debug!(line, "chorus opened");
        self.open = Some(OpenSection::Chorus {
            opened_at: line,
            font_size: self.pending_font_size.take(),
            children: Vec::new(),
        });
        Ok(())
    }

    fn close_chorus(&mut self, line: usize) -> Result<()> {
        match self.open.take() {
            Some(OpenSection::Chorus {
                font_size,
                children,
                ..
            }) => {
                debug!(line, "chorus closed");
                self.song.children.push(Node::Chorus {
                    children,
                    font_size,
                });
                Ok(())
            }
            other => {
                self.open = other;
                Err(Error::Structure {
                    line,
                    kind: StructureError::UnmatchedEndOfChorus,
                })
            }
        }
    }

    fn finish(mut self) -> Result<Song> {
        if let Some(OpenSection::Chorus { opened_at, .. }) = self.open {
            return Err(Error::Structure {
                line: self.last_line,
                kind: StructureError::UnterminatedSection { opened_at },
            });
        }
        self.close_verse();
        if let Some(size) = self.pending_font_size {
            debug!(size, "font size at end of input has no content to apply to");
        }
        Ok(self.song)
    }
}

// ─── Chord definitions ───────────────────────────────────────────────

/// Parse the value of a `{define: NAME frets N.. fingers N..}` directive.
///
/// Exactly one fret and one finger number per string are required; frets
/// above `max_fret` are rejected.
pub fn parse_chord_definition(
    value: &str,
    max_fret: u32,
    strings: Option<usize>,
) -> std::result::Result<(String, Vec<u32>), DefinitionError> {
    let malformed = |reason| DefinitionError::Malformed {
        definition: value.to_string(),
        reason,
    };

    let mut tokens = value.split_whitespace();
    let name = tokens.next().ok_or_else(|| malformed("missing chord name"))?;
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '+' | '#'))
    {
        return Err(malformed("invalid chord name"));
    }
    if tokens.next() != Some("frets") {
        return Err(malformed("expected `frets` after the chord name"));
    }

    let mut frets = Vec::new();
    let mut saw_fingers = false;
    for token in tokens.by_ref() {
        if token == "fingers" {
            saw_fingers = true;
            break;
        }
        frets.push(parse_number(token).ok_or_else(|| malformed("fret is not a number"))?);
    }
    if !saw_fingers {
        return Err(malformed("expected `fingers` after the frets"));
    }
    let fingers = tokens
        .map(|token| parse_number(token).ok_or_else(|| malformed("finger is not a number")))
        .collect::<std::result::Result<Vec<u32>, _>>()?;

    let expected = strings.unwrap_or(frets.len());
    for found in [frets.len(), fingers.len()] {
        if found != expected || found == 0 {
            return Err(DefinitionError::StringCount {
                name: name.to_string(),
                expected,
                found,
            });
        }
    }
    if let Some(&fret) = frets.iter().find(|&&fret| fret > max_fret) {
        return Err(DefinitionError::FretTooHigh {
            name: name.to_string(),
            fret,
            max: max_fret,
        });
    }

    Ok((name.to_string(), frets))
}

fn parse_number(token: &str) -> Option<u32> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse_text(text: &str) -> Result<Song> {
        parse_str(text, &ParseOptions::default())
    }

    fn structure_kind(err: Error) -> StructureError {
        match err {
            Error::Structure { kind, .. } => kind,
            other => panic!("expected a structure error, got {other:?}"),
        }
    }

    #[test]
    fn parses_verse_and_chorus() {
        let song = parse_text(
            "{title:Test}\n\nHello [C]world\n\n{start_of_chorus}\n[G]Sing!\n{end_of_chorus}\n",
        )
        .unwrap();

        assert_eq!(
            song,
            Song {
                title: Some("Test".into()),
                subtitle: None,
                children: vec![
                    Node::verse(vec![Node::line(vec![
                        Segment::plain("Hello "),
                        Segment::chorded("C", "world"),
                    ])]),
                    Node::chorus(vec![Node::line(vec![Segment::chorded("G", "Sing!")])]),
                ],
                chords: ChordTable::new(),
            }
        );
    }

    #[test]
    fn blank_lines_split_verses() {
        let song = parse_text("one\n{comment: quietly}\ntwo\n\n\n\nthree\n").unwrap();
        assert_eq!(
            song.children,
            vec![
                Node::verse(vec![
                    Node::line(vec![Segment::plain("one")]),
                    Node::comment("quietly"),
                    Node::line(vec![Segment::plain("two")]),
                ]),
                Node::verse(vec![Node::line(vec![Segment::plain("three")])]),
            ]
        );
    }

    #[test]
    fn chorus_boundary_closes_the_open_verse() {
        let song = parse_text("verse\n{soc}\nchorus\n{eoc}\nafter\n").unwrap();
        assert_eq!(
            song.children,
            vec![
                Node::verse(vec![Node::line(vec![Segment::plain("verse")])]),
                Node::chorus(vec![Node::line(vec![Segment::plain("chorus")])]),
                Node::verse(vec![Node::line(vec![Segment::plain("after")])]),
            ]
        );
    }

    #[test]
    fn blank_inside_chorus_is_a_paragraph_break() {
        let song = parse_text("{start-of-chorus}\na\n\nb\n{end-of-chorus}").unwrap();
        assert_eq!(
            song.children,
            vec![Node::chorus(vec![
                Node::line(vec![Segment::plain("a")]),
                Node::line(vec![]),
                Node::line(vec![Segment::plain("b")]),
            ])]
        );
    }

    #[test]
    fn title_and_subtitle_are_metadata_only() {
        let song = parse_text("{title: First }\n{subtitle:Sub}\n{title:Second}\n").unwrap();
        assert_eq!(song.title.as_deref(), Some("Second"));
        assert_eq!(song.subtitle.as_deref(), Some("Sub"));
        assert!(song.children.is_empty());
    }

    #[test]
    fn nested_chorus_fails_before_any_line() {
        let err = parse_text("{start_of_chorus}\n{start_of_chorus}\n[C]never parsed\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert_eq!(structure_kind(err), StructureError::NestedChorus { opened_at: 1 });
    }

    #[test]
    fn unmatched_end_of_chorus_fails() {
        let err = parse_text("la la\n{eoc}\n").unwrap_err();
        assert_eq!(structure_kind(err), StructureError::UnmatchedEndOfChorus);
    }

    #[test]
    fn unterminated_chorus_fails() {
        let err = parse_text("{soc}\n[G]Sing!\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert_eq!(structure_kind(err), StructureError::UnterminatedSection { opened_at: 1 });
    }

    #[test]
    fn unknown_directive_names_the_key() {
        let err = parse_text("{colour:red}").unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { line: 1, ref key } if key == "colour"));
    }

    #[test]
    fn directive_keys_are_case_sensitive() {
        let err = parse_text("{SOC}").unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { ref key, .. } if key == "SOC"));
    }

    #[test]
    fn defines_populate_the_chord_table() {
        let song = parse_text(
            "{define: Dm frets 0 1 2 2 fingers 1 2 3 4}\n{define: Dm frets 2 2 1 0 fingers 2 3 1 0}\n",
        )
        .unwrap();
        assert!(song.children.is_empty());
        assert_eq!(song.chords.get("Dm"), Some(&[2, 2, 1, 0][..]));
    }

    #[test]
    fn bad_define_reports_the_line() {
        let err = parse_text("ok\n{define: Dm frets 0 1 2 50 fingers 1 2 3 4}").unwrap_err();
        assert!(matches!(
            err,
            Error::Definition {
                line: 2,
                source: DefinitionError::FretTooHigh { fret: 50, max: 20, .. }
            }
        ));
    }

    #[test]
    fn font_size_attaches_to_the_next_node() {
        let song = parse_text("a\n{fontsize: 18}\n{comment:loud}\nb\n").unwrap();
        assert_eq!(
            song.children[0].children(),
            &[
                Node::line(vec![Segment::plain("a")]),
                Node::Comment {
                    text: "loud".into(),
                    font_size: Some(18)
                },
                Node::line(vec![Segment::plain("b")]),
            ]
        );
    }

    #[test]
    fn font_size_before_a_section_belongs_to_the_section() {
        let song = parse_text("verse\n\n{fontsize: 28}\n{soc}\nchorus\n{eoc}\n{fontsize:9}\nafter\n")
            .unwrap();
        assert_eq!(
            song.children,
            vec![
                Node::verse(vec![Node::line(vec![Segment::plain("verse")])]),
                Node::chorus(vec![Node::line(vec![Segment::plain("chorus")])]).with_font_size(28),
                Node::verse(vec![Node::line(vec![Segment::plain("after")])]).with_font_size(9),
            ]
        );
    }

    #[test]
    fn directive_keys_ignore_surrounding_whitespace() {
        let song = parse_text("{  title\t : x }\n{ soc }\n{eoc\t}").unwrap();
        assert_eq!(song.title.as_deref(), Some("x"));
        assert_eq!(song.children, vec![Node::chorus(vec![])]);
    }

    #[test]
    fn inner_whitespace_in_keys_is_not_ignored() {
        let err = parse_text("{start of chorus}").unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { ref key, .. } if key == "start of chorus"));
    }

    #[rstest]
    #[case("big")]
    #[case("0")]
    #[case("-3")]
    #[case("")]
    fn invalid_font_sizes_fail(#[case] value: &str) {
        let err = parse_text(&format!("{{fontsize:{value}}}")).unwrap_err();
        assert!(matches!(err, Error::InvalidFontSize { line: 1, .. }));
    }

    #[test]
    fn top_level_comment_opens_a_verse() {
        let song = parse_text("{comment:Intro}\n").unwrap();
        assert_eq!(song.children, vec![Node::verse(vec![Node::comment("Intro")])]);
    }

    #[test]
    fn hash_comments_split_verses_when_enabled() {
        let options = ParseOptions {
            classify: ClassifyOptions {
                skip_hash_comments: true,
            },
            ..ParseOptions::default()
        };
        let song = parse_str("a\n# note\nb", &options).unwrap();
        assert_eq!(song.children.len(), 2);
    }

    // ─── Chord definitions ──────────────────────────────────────────

    #[test]
    fn simple_fret_definition() {
        let (name, frets) =
            parse_chord_definition(" Dm frets 0 1 2 2 fingers 1 2 3 4", MAX_FRET, Some(4)).unwrap();
        assert_eq!(name, "Dm");
        assert_eq!(frets, vec![0, 1, 2, 2]);
    }

    #[rstest]
    #[case::garbage_at_end(" Dm frets 0 1 2 2 fingers 1 2 3 4xxx")]
    #[case::garbage_at_beginning("xxx Dm frets 0 1 2 2 fingers 1 2 3 4")]
    #[case::missing_fingers(" Dm frets 0 1 2 2")]
    #[case::bad_name(" D(m) frets 0 1 2 2 fingers 1 2 3 4")]
    #[case::empty("")]
    fn malformed_definitions(#[case] value: &str) {
        assert!(matches!(
            parse_chord_definition(value, MAX_FRET, Some(4)),
            Err(DefinitionError::Malformed { .. })
        ));
    }

    #[test]
    fn fret_too_high() {
        assert_eq!(
            parse_chord_definition(" Dmextreme frets 0 1 2 5000 fingers 1 2 3 4", MAX_FRET, Some(4)),
            Err(DefinitionError::FretTooHigh {
                name: "Dmextreme".into(),
                fret: 5000,
                max: MAX_FRET
            })
        );
    }

    #[test]
    fn wrong_string_count() {
        assert!(matches!(
            parse_chord_definition("E frets 0 2 2 1 0 0 fingers 0 2 3 1 0 0", MAX_FRET, Some(4)),
            Err(DefinitionError::StringCount { expected: 4, found: 6, .. })
        ));
        assert_eq!(
            parse_chord_definition("E frets 0 2 2 1 0 0 fingers 0 2 3 1 0 0", MAX_FRET, None)
                .unwrap()
                .1,
            vec![0, 2, 2, 1, 0, 0]
        );
    }

    #[test]
    fn fret_limit_is_inclusive() {
        for fret in [0, 7, MAX_FRET] {
            let value = format!("C/G frets {fret} 0 0 3 fingers 1 0 0 3");
            let (name, frets) = parse_chord_definition(&value, MAX_FRET, Some(4)).unwrap();
            assert_eq!(name, "C/G");
            assert_eq!(frets, vec![fret, 0, 0, 3]);
        }
        assert!(parse_chord_definition(
            &format!("C frets {} 0 0 3 fingers 1 0 0 3", MAX_FRET + 1),
            MAX_FRET,
            Some(4)
        )
        .is_err());
    }
}
