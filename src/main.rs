//! chordsheet CLI - parse, transpose, convert and number chord charts.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chordsheet::convert::{convert, detect_notation};
use chordsheet::{
    chart_key, nashville_content, parse_chart, transpose_chart, transpose_chart_to, EngineConfig,
    Notation, OutputFormat, Spelling,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};

/// Chord chart text engine
#[derive(Parser)]
#[command(name = "chordsheet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (default: ./chordsheet.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print metadata, directives, sections and arrangement of a chart
    Parse {
        /// Chart file, or `-` for stdin
        input: String,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transpose every chord of a chart
    Transpose {
        /// Chart file, or `-` for stdin
        input: String,

        /// Semitones to move, negative for down
        #[arg(short, long, allow_hyphen_values = true, conflicts_with = "to")]
        semitones: Option<i32>,

        /// Destination key; the chart must declare its own key
        #[arg(short, long)]
        to: Option<String>,

        /// Spell accidentals with flats
        #[arg(long, conflicts_with = "sharps")]
        flats: bool,

        /// Spell accidentals with sharps
        #[arg(long)]
        sharps: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert between inline and stacked chord notation
    Convert {
        /// Chart file, or `-` for stdin
        input: String,

        /// Target notation (default: the opposite of the input's, else the config's)
        #[arg(long, value_enum)]
        to: Option<NotationArg>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite chords as Nashville numbers
    Nashville {
        /// Chart file, or `-` for stdin
        input: String,

        /// Key to number against (default: the chart's key)
        #[arg(short, long)]
        key: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum NotationArg {
    Inline,
    Stacked,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read chart from stdin")?;
        Ok(source)
    } else {
        fs::read_to_string(input).with_context(|| format!("Error reading file '{}'", input))
    }
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Error writing to '{}'", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = EngineConfig::discover(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Parse {
            input,
            format,
            output,
        } => {
            let chart = parse_chart(&read_input(&input)?);
            let format = match format {
                Some(FormatArg::Yaml) => OutputFormat::Yaml,
                Some(FormatArg::Json) => OutputFormat::Json,
                None => config.output,
            };
            let rendered = match format {
                OutputFormat::Yaml => serde_yaml::to_string(&chart)?,
                OutputFormat::Json => serde_json::to_string_pretty(&chart)?,
            };
            write_output(output.as_deref(), &rendered)
        }

        Commands::Transpose {
            input,
            semitones,
            to,
            flats,
            sharps,
            output,
        } => {
            let source = read_input(&input)?;
            let spelling = if flats {
                Spelling::Flats
            } else if sharps {
                Spelling::Sharps
            } else {
                config.spelling
            };
            let transposed = match (semitones, to) {
                (Some(n), _) => transpose_chart(&source, n, spelling),
                (None, Some(key)) => transpose_chart_to(&source, &key, spelling)
                    .with_context(|| format!("Cannot transpose to '{}'", key))?,
                (None, None) => bail!("Either --semitones or --to is required"),
            };
            write_output(output.as_deref(), &transposed)
        }

        Commands::Convert { input, to, output } => {
            let source = read_input(&input)?;
            let target = match to {
                Some(NotationArg::Inline) => Notation::Inline,
                Some(NotationArg::Stacked) => Notation::Stacked,
                None => match detect_notation(&source) {
                    Some(Notation::Inline) => Notation::Stacked,
                    Some(Notation::Stacked) => Notation::Inline,
                    None => config.notation,
                },
            };
            debug!(?target, "converting");
            write_output(output.as_deref(), &convert(&source, target))
        }

        Commands::Nashville { input, key, output } => {
            let source = read_input(&input)?;
            let key = match key {
                Some(key) => key,
                None => match chart_key(&source) {
                    Some(key) => key.to_string(),
                    None => bail!("Chart has no key; pass one with --key"),
                },
            };
            write_output(output.as_deref(), &nashville_content(&source, &key))
        }
    }
}
