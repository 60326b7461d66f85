//! Conversion settings, optionally loaded from a YAML file.
//!
//! ```yaml
//! max_fret: 12
//! skip_hash_comments: true
//! font_size: 12
//! page:
//!   width: 612
//!   height: 792
//! chords:
//!   Cadd9: [0, 2, 3, 3]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chords::{ChordTable, MAX_FRET};
use crate::classify::ClassifyOptions;
use crate::error::{Error, Result};
use crate::parser::ParseOptions;
use crate::renderer::{PageSetup, RenderOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Highest fret a chord shape may use
    pub max_fret: u32,
    /// Treat lines starting with `#` as blank
    pub skip_hash_comments: bool,
    /// Body font size in points
    pub font_size: f64,
    pub page: PageSetup,
    /// Start from the built-in ukulele chords
    pub builtin_chords: bool,
    /// Extra shapes layered over the built-in ones
    pub chords: ChordTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_fret: MAX_FRET,
            skip_hash_comments: false,
            font_size: RenderOptions::DEFAULT_FONT_SIZE,
            page: PageSetup::a4(),
            builtin_chords: true,
            chords: ChordTable::new(),
        }
    }
}

impl Config {
    /// Read and validate a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.font_size.is_nan() || self.font_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }

        let page = &self.page;
        let margins = [
            page.margin_left,
            page.margin_right,
            page.margin_top,
            page.margin_bottom,
        ];
        if margins.iter().any(|m| *m < 0.0) {
            return Err(Error::InvalidConfig("page margins must not be negative".into()));
        }
        if page.width <= page.margin_left + page.margin_right
            || page.height <= page.margin_top + page.margin_bottom
        {
            return Err(Error::InvalidConfig(format!(
                "page {}x{} leaves no room inside its margins",
                page.width, page.height
            )));
        }

        let strings = if self.builtin_chords {
            ChordTable::ukulele().string_count()
        } else {
            self.chords.string_count()
        };
        for (name, frets) in self.chords.iter() {
            if let Some(&fret) = frets.iter().find(|&&fret| fret > self.max_fret) {
                return Err(Error::InvalidConfig(format!(
                    "chord `{name}` uses fret {fret}, above max_fret {}",
                    self.max_fret
                )));
            }
            if frets.is_empty() || strings.is_some_and(|count| count != frets.len()) {
                return Err(Error::InvalidConfig(format!(
                    "chord `{name}` has {} strings, expected {}",
                    frets.len(),
                    strings.unwrap_or(frets.len()).max(1)
                )));
            }
        }
        Ok(())
    }

    /// Built-in shapes (if enabled) with the configured ones on top.
    pub fn chord_table(&self) -> ChordTable {
        let mut table = if self.builtin_chords {
            ChordTable::ukulele()
        } else {
            ChordTable::new()
        };
        table.extend_from(&self.chords);
        table
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_fret: self.max_fret,
            strings: self.chord_table().string_count(),
            classify: ClassifyOptions {
                skip_hash_comments: self.skip_hash_comments,
            },
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            page: self.page,
            font_size: self.font_size,
            chords: self.chord_table(),
        }
    }
}
