//! `gait` binary: analyse one accelerometer capture.
//!
//! # Usage
//!
//! ```bash
//! gait capture.csv --subject S01 --condition Normal --trial Trial1
//! gait --synthetic --seed 42 --commentary --output all
//! ```
//!
//! Results are written to stdout as JSON; logs go to stderr.

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

use gait_analysis::{
    AnalysisConfig, CycleRow, GaitSession, StepRow, SummaryRow, TimeRange, TrialInfo, TrialLog,
};
use gait_commentary::{CommentaryConfig, CommentaryService, TemplateCommentator};
use gait_core::{LabelConfig, LabelMode, Side};
use gait_signal::{CsvSource, SampleSource, SyntheticWalk};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    Summary,
    Steps,
    Cycles,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DominantArg {
    Left,
    Right,
}

impl From<DominantArg> for Side {
    fn from(arg: DominantArg) -> Self {
        match arg {
            DominantArg::Left => Side::Left,
            DominantArg::Right => Side::Right,
        }
    }
}

/// Command-line arguments for the analysis binary.
#[derive(Parser, Debug)]
#[command(
    name = "gait",
    version,
    about = "Accelerometer gait analysis",
    long_about = None
)]
struct Args {
    /// CSV capture with a header line and `time,ax,ay,az` rows.
    #[arg(value_name = "FILE", required_unless_present = "synthetic")]
    input: Option<PathBuf>,

    /// Analyse a generated walk instead of a file.
    #[arg(long, default_value_t = false, conflicts_with = "input")]
    synthetic: bool,

    /// RNG seed for `--synthetic`.
    #[arg(long)]
    seed: Option<u64>,

    /// Step frequency of the synthetic walk in Hz.
    #[arg(long, value_name = "HZ")]
    walking_freq: Option<f64>,

    /// Length of the synthetic walk in seconds.
    #[arg(long, value_name = "SECS")]
    duration: Option<f64>,

    /// Noise multiplier for the synthetic walk (0 disables noise).
    #[arg(long, value_name = "SCALE")]
    noise_scale: Option<f64>,

    /// Analysis configuration file (JSON, TOML or YAML).
    ///
    /// `GAIT_` environment variables override it; without a file they
    /// override the defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start of the detection range in seconds.
    #[arg(long, requires = "to")]
    from: Option<f64>,

    /// End of the detection range in seconds.
    #[arg(long, requires = "from")]
    to: Option<f64>,

    /// The first event is a right heel-strike.
    #[arg(long, default_value_t = false)]
    start_right: bool,

    /// Report sides as dominant/non-dominant, with this side dominant.
    #[arg(long, value_enum, value_name = "SIDE")]
    dominant: Option<DominantArg>,

    #[arg(long, default_value = "SUBJECT")]
    subject: String,

    #[arg(long, default_value = "Normal")]
    condition: String,

    #[arg(long, default_value = "Trial1")]
    trial: String,

    /// Which rows to print.
    #[arg(long, value_enum, default_value_t = OutputKind::Summary)]
    output: OutputKind,

    /// Append template commentary to the output.
    #[arg(long, default_value_t = false)]
    commentary: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Vec<SummaryRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<Vec<StepRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycles: Option<Vec<CycleRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commentary: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> gait_core::Result<()> {
    let mut config = match args.config.as_deref() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            AnalysisConfig::from_file(path)?
        }
        None => AnalysisConfig::from_env()?,
    };

    if args.start_right {
        config.start_with_left = false;
    }
    if let Some(dominant) = args.dominant {
        config.labels = LabelConfig {
            mode: LabelMode::Functional,
            dominant_side: dominant.into(),
        };
    }

    let mut source: Box<dyn SampleSource> = match &args.input {
        Some(path) if !args.synthetic => Box::new(CsvSource::from_path(path)),
        _ => {
            let mut walk = SyntheticWalk::new();
            if let Some(seed) = args.seed {
                walk = walk.with_seed(seed);
            }
            if let Some(freq) = args.walking_freq {
                walk = walk.with_walking_freq(freq);
            }
            if let Some(duration) = args.duration {
                walk = walk.with_duration(duration);
            }
            if let Some(scale) = args.noise_scale {
                walk = walk.with_noise_scale(scale);
            }
            Box::new(walk)
        }
    };

    info!("Reading capture from {}", source.name());
    let mut session = GaitSession::from_source(source.as_mut(), config)?;

    let selection = match (args.from, args.to) {
        (Some(from), Some(to)) => Some(TimeRange::new(from, to)),
        _ => None,
    };
    let events = session.detect_events(selection)?.len();
    info!("Detected {} heel-strikes", events);

    let result = session.analyze()?;
    let info = TrialInfo::new(&args.subject, &args.condition, &args.trial);

    let commentary = if args.commentary {
        let service =
            CommentaryService::new(TemplateCommentator::new(), CommentaryConfig::default());
        Some(service.commentary(&info.subject_id, &result).await)
    } else {
        None
    };

    let mut log = TrialLog::new();
    let next = log.save(info, result);
    info!("Next trial would be {}", next.trial);

    let report = Report::from_log(&log, args.output, commentary);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

impl Report {
    fn from_log(log: &TrialLog, output: OutputKind, commentary: Option<String>) -> Self {
        let wants = |kind: OutputKind| output == kind || output == OutputKind::All;

        Self {
            summary: wants(OutputKind::Summary).then(|| log.summary_rows()),
            steps: wants(OutputKind::Steps).then(|| log.step_rows()),
            cycles: wants(OutputKind::Cycles).then(|| log.cycle_rows()),
            commentary,
        }
    }
}
