//! Integration tests — parse the sample sheets in the samples/ directory.

use chordsheet::{parse_file, parse_str, song_to_json, Node, Segment, Song};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
}

fn line(segments: &[(Option<&str>, &str)]) -> Node {
    Node::line(
        segments
            .iter()
            .map(|(chord, text)| Segment::new(*chord, *text))
            .collect(),
    )
}

// ─── example.chd ────────────────────────────────────────────────────

#[test]
fn parse_example_song() {
    let song = parse_file(samples_dir().join("example.chd")).expect("Failed to parse example.chd");

    assert_eq!(song.title.as_deref(), Some("This is an example song"));
    assert_eq!(song.subtitle.as_deref(), Some("With an example subtitle"));
    assert!(song.chords.is_empty(), "example.chd defines no chords");

    let chorus_line = line(&[
        (Some("C"), "This is "),
        (Some("D"), "a "),
        (Some("G"), "chorus!"),
    ]);
    assert_eq!(
        song.children,
        vec![
            Node::verse(vec![
                line(&[
                    (None, "This song has "),
                    (Some("Dm"), "example "),
                    (Some("C"), "lyrics."),
                ]),
                line(&[(None, "And "), (Some("C"), "another example line.")]),
            ]),
            Node::chorus(vec![chorus_line.clone(), chorus_line]),
            Node::verse(vec![
                line(&[(None, "And another verse.")]),
                line(&[(None, "And no trailing newline.")]),
            ]),
        ]
    );

    assert_eq!(song.line_count(), 6);
    assert_eq!(song.chord_names(), vec!["Dm", "C", "D", "G"]);
    println!("✓ example.chd: {} sections, {} lines", song.children.len(), song.line_count());
}

// ─── hello.chd ──────────────────────────────────────────────────────

#[test]
fn parse_hello_song() {
    let song = parse_file(samples_dir().join("hello.chd")).expect("Failed to parse hello.chd");

    let expected = Song {
        title: Some("Test".into()),
        children: vec![
            Node::verse(vec![line(&[(None, "Hello "), (Some("C"), "world")])]),
            Node::chorus(vec![line(&[(Some("G"), "Sing!")])]),
        ],
        ..Song::default()
    };
    assert_eq!(song, expected);
}

// ─── definitions.chd ────────────────────────────────────────────────

#[test]
fn parse_definitions_song() {
    let song =
        parse_file(samples_dir().join("definitions.chd")).expect("Failed to parse definitions.chd");

    assert_eq!(song.title.as_deref(), Some("Definitions"));
    assert_eq!(song.chords.len(), 2);
    assert_eq!(song.chords.get("Cadd9"), Some(&[0, 2, 3, 3][..]));
    // The second define of G wins.
    assert_eq!(song.chords.get("G"), Some(&[4, 2, 3, 2][..]));

    assert_eq!(
        song.children,
        vec![
            Node::verse(vec![
                Node::comment("Intro, gently"),
                line(&[(Some("Cadd9"), "Morning "), (Some("G"), "light")]),
            ]),
            // Each fontsize hint precedes a section, so the section carries it.
            Node::chorus(vec![
                line(&[(Some("Am"), "Rise and "), (Some("F"), "shine")]),
                Node::comment("twice"),
            ])
            .with_font_size(18),
            Node::verse(vec![line(&[(Some("C"), "All "), (Some("G7"), "done")])]).with_font_size(12),
        ]
    );
}

// ─── JSON ───────────────────────────────────────────────────────────

#[test]
fn song_json_round_trips() {
    let song = parse_file(samples_dir().join("definitions.chd")).unwrap();
    let json = song_to_json(&song).expect("Failed to serialize");

    assert!(json.contains(r#""kind": "chorus""#));
    assert!(json.contains(r#""Cadd9""#));

    let back: Song = serde_json::from_str(&json).expect("Failed to deserialize");
    assert_eq!(back, song);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_file(samples_dir().join("no-such-song.chd")).unwrap_err();
    assert!(matches!(err, chordsheet::Error::Io(_)));
}

#[test]
fn crlf_input_parses_like_lf() {
    let lf = std::fs::read_to_string(samples_dir().join("hello.chd")).unwrap();
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(parse_str(&crlf).unwrap(), parse_str(&lf).unwrap());
}
