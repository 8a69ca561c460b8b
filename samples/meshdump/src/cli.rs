use nalgebra::Vector3;
use tessel::render::DrawMode;
use tracing_subscriber::{fmt::time::OffsetTime, EnvFilter};

use std::str::FromStr;

/// How log events are written to stderr.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event
    Compact,
    /// Multi-line, with source locations
    Pretty,
    /// Newline-delimited JSON
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Mode {
    Triangles,
    Strip,
    Fan,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Triangles => f.write_str("triangles"),
            Mode::Strip => f.write_str("strip"),
            Mode::Fan => f.write_str("fan"),
        }
    }
}

impl From<Mode> for DrawMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Triangles => DrawMode::Triangles,
            Mode::Strip => DrawMode::TriangleStrip,
            Mode::Fan => DrawMode::TriangleFan,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,tessel=info,meshdump=info",
        env = "MESHDUMP_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, value_enum, default_value = "compact", env = "MESHDUMP_LOG_FORMAT")]
    pub log_format: LogFormat,
    /// How the cube's index list is assembled
    #[arg(short, long, default_value_t = Mode::Triangles)]
    pub mode: Mode,
    /// Solid RGBA color for the cube, each channel in [0, 1]
    #[arg(short, long, value_parser = parse_rgba, value_name = "R,G,B,A")]
    pub color: Option<[f32; 4]>,
    /// Number of clones drawn alongside the original
    #[arg(short = 'n', long, default_value_t = 2)]
    pub clones: usize,
    /// Offset between consecutive clones
    #[arg(short, long, default_value = "3,0,0", value_parser = parse_vec3, value_name = "X,Y,Z")]
    pub spacing: Vector3<f32>,
    /// Print every bound buffer's contents, not just command summaries
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected} comma-separated components, found {found}")]
    Components { expected: usize, found: usize },
    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),
}

fn parse_components<const N: usize>(s: &str) -> Result<[f32; N], ParseError> {
    let parts = s
        .trim()
        .split(',')
        .map(|p| f32::from_str(p.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    let found = parts.len();
    parts
        .try_into()
        .map_err(|_| ParseError::Components { expected: N, found })
}

fn parse_vec3(s: &str) -> Result<Vector3<f32>, ParseError> {
    parse_components::<3>(s).map(Vector3::from)
}

fn parse_rgba(s: &str) -> Result<[f32; 4], ParseError> {
    parse_components::<4>(s)
}

/// Install the global subscriber for this run.
///
/// An unparseable `--log-filter` falls back to `info` rather than aborting, and says so once the
/// subscriber is up.
pub(crate) fn initialize_tracing(cli: &Cli) {
    let (filter, bad_filter) = match EnvFilter::try_new(&cli.log_filter) {
        Ok(f) => (f, None),
        Err(e) => (EnvFilter::new("info"), Some(e)),
    };
    let offset = time::UtcOffset::current_local_offset();
    let timer = OffsetTime::new(
        offset.as_ref().map_or(time::UtcOffset::UTC, |o| *o),
        time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
    );
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(timer)
        .with_target(cli.verbose)
        .with_env_filter(filter);

    match cli.log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }

    if let Some(e) = bad_filter {
        tracing::warn!(filter = %cli.log_filter, "invalid log filter, using `info`: {e}");
    }
    if let Err(e) = offset {
        tracing::debug!("logging in UTC; local offset unavailable: {e}");
    }
}
