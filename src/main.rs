use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use chordsheet::renderer::Recorder;
use chordsheet::{parse_reader, render_song, Config, Song};

#[derive(Parser, Debug)]
#[command(name = "chordsheet", about = "Render ChordPro-style lyric sheets with chord diagrams")]
struct Cli {
    /// Markup file to read; stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Where to write the result; stdout when omitted or `-`
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Text,
    /// The parsed song tree
    Json,
    /// Recorded drawing operations
    Ops,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> chordsheet::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let song = read_song(cli.input.as_deref(), &config)?;
    info!(
        title = song.title.as_deref().unwrap_or(""),
        sections = song.children.len(),
        lines = song.line_count(),
        chords = ?song.chord_names(),
        "parsed song"
    );

    let rendered = match cli.format {
        Format::Svg => chordsheet::render_song_to_svg(&song, &config.render_options())?,
        Format::Text => chordsheet::render_song_to_text(&song, &config.render_options())?,
        Format::Json => chordsheet::song_to_json(&song)?,
        Format::Ops => {
            let mut recorder = Recorder::new();
            render_song(&song, &config.render_options(), &mut recorder)?;
            recorder.to_json()?
        }
    };

    write_output(cli.output.as_deref(), &rendered)
}

fn is_stdio(path: &Path) -> bool {
    path == Path::new("-")
}

fn read_song(input: Option<&Path>, config: &Config) -> chordsheet::Result<Song> {
    let options = config.parse_options();
    match input {
        Some(path) if !is_stdio(path) => {
            info!(path = %path.display(), "reading markup");
            parse_reader(BufReader::new(File::open(path)?), &options)
        }
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            chordsheet::parser::parse_str(&text, &options)
        }
    }
}

fn write_output(output: Option<&Path>, rendered: &str) -> chordsheet::Result<()> {
    match output {
        Some(path) if !is_stdio(path) => {
            std::fs::write(path, rendered)?;
            info!(path = %path.display(), bytes = rendered.len(), "wrote output");
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
