//! chordsheet — ChordPro-style lyric sheet parser and chord chart renderer.
//!
//! Markup lines are classified, grouped into verses and choruses, then laid
//! out with chords floating above their syllables and a fretboard diagram for
//! every chord used.
//!
//! # Example
//! ```no_run
//! use chordsheet::{parse_file, render_song_to_svg, RenderOptions};
//!
//! let song = parse_file("path/to/song.chd").unwrap();
//! println!("Title: {:?}", song.title);
//! println!("Lines: {}", song.line_count());
//! let svg = render_song_to_svg(&song, &RenderOptions::default()).unwrap();
//! ```

pub mod chords;
pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod renderer;

use std::io::BufRead;
use std::path::Path;

pub use chords::{ChordTable, MAX_FRET};
pub use classify::{classify, ClassifiedLine};
pub use config::Config;
pub use error::{DefinitionError, Error, Result, StructureError};
pub use model::*;
pub use parser::{parse, parse_lines, ParseOptions};
pub use renderer::{
    record_song, render_song, render_song_to_svg, render_song_to_text, RenderOptions, Surface,
};

/// Parse a markup file with default options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Song> {
    let text = std::fs::read_to_string(path)?;
    parse_str(&text)
}

/// Parse markup text with default options.
pub fn parse_str(text: &str) -> Result<Song> {
    parser::parse_str(text, &ParseOptions::default())
}

/// Parse markup from any line source, e.g. a locked stdin.
pub fn parse_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Song> {
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    parse_lines(lines, options)
}

/// Convert a parsed song to a JSON string.
pub fn song_to_json(song: &Song) -> Result<String> {
    Ok(serde_json::to_string_pretty(song)?)
}

/// Parse markup text and render it straight to SVG.
pub fn render_str_to_svg(text: &str, config: &Config) -> Result<String> {
    let song = parser::parse_str(text, &config.parse_options())?;
    render_song_to_svg(&song, &config.render_options())
}

/// Parse a markup file and render it straight to SVG.
pub fn render_file_to_svg<P: AsRef<Path>>(path: P, config: &Config) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    render_str_to_svg(&text, config)
}

/// Parse markup text and render it as a plain-text chord sheet.
pub fn render_str_to_text(text: &str, config: &Config) -> Result<String> {
    let song = parser::parse_str(text, &config.parse_options())?;
    render_song_to_text(&song, &config.render_options())
}
