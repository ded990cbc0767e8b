//! coin-counter CLI: runs a directory of still frames through the counter
//! and reports the coins that crossed the counting band.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;

use coin_counter::detect::{load_frame, rgb_from_frame, DetectError};
use coin_counter::{
    CoinCounter, CoinCounterParams, CoinTally, FrameReport, PipelineError, TrackOutcome,
};

const FRAME_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "ppm", "pgm", "pnm"];

#[derive(Parser, Debug)]
#[command(name = "coin-counter")]
#[command(about = "Count and value coins crossing the middle band of a frame sequence")]
#[command(version)]
struct Cli {
    /// Directory of frames, processed in file name order.
    #[arg(long, value_name = "DIR")]
    frames: PathBuf,

    /// JSON file with pipeline parameters; omitted fields keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the JSON report here instead of stdout.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Save annotated frames (PNG) into this directory.
    #[arg(long, value_name = "DIR")]
    annotated: Option<PathBuf>,

    /// Log per-frame details.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: invalid config: {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Params(PipelineError),

    #[error("could not serialize report: {0}")]
    Report(serde_json::Error),

    #[error("{}: {source}", path.display())]
    Frame { path: PathBuf, source: DetectError },

    #[error("{}: {source}", path.display())]
    Pipeline {
        path: PathBuf,
        source: PipelineError,
    },

    #[error("{}: could not encode annotated frame: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("no frames found in {}", .0.display())]
    NoFrames(PathBuf),
}

#[derive(Debug, Serialize)]
struct CountEvent {
    frame: usize,
    file: String,
    denomination: coin_counter::Denomination,
    xc: usize,
    yc: usize,
    area: usize,
    perimeter: usize,
}

/// Frame that was treated as empty because it could not be decoded or
/// processed.
#[derive(Debug, Serialize)]
struct SkippedFrame {
    file: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct RunReport {
    frames: usize,
    tally: CoinTally,
    total_value: f64,
    events: Vec<CountEvent>,
    skipped: Vec<SkippedFrame>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(feature = "tracing")]
fn init_logging(_verbose: bool) {
    coin_counter::core::init_tracing(false);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = coin_counter::core::init_with_level(level);
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let params: CoinCounterParams = match &cli.config {
        Some(path) => {
            serde_json::from_str(&read_to_string(path)?).map_err(|source| CliError::Config {
                path: path.clone(),
                source,
            })?
        }
        None => CoinCounterParams::default(),
    };
    params.validate().map_err(CliError::Params)?;

    let paths = list_frames(&cli.frames)?;
    if let Some(dir) = &cli.annotated {
        fs::create_dir_all(dir).map_err(|source| CliError::Io {
            path: dir.clone(),
            source,
        })?;
    }

    let mut counter: Option<CoinCounter> = None;
    let mut events = Vec::new();
    let mut skipped = Vec::new();
    for path in &paths {
        let file = file_name(path);
        let report = match process(&mut counter, path, &params) {
            Ok(report) => report,
            Err(err) => {
                log::warn!("{err}; treating the frame as empty");
                skipped.push(SkippedFrame {
                    file,
                    reason: err.to_string(),
                });
                if let Some(counter) = counter.as_mut() {
                    counter.skip_frame();
                }
                continue;
            }
        };
        log::debug!(
            "{}: {} blobs, {} in band, {} new",
            path.display(),
            report.blobs.len(),
            report.tracked.len(),
            report.newly_counted
        );

        for tracked in &report.tracked {
            if let TrackOutcome::Counted { denomination } = tracked.outcome {
                events.push(CountEvent {
                    frame: report.frame_index,
                    file: file.clone(),
                    denomination,
                    xc: tracked.blob.xc,
                    yc: tracked.blob.yc,
                    area: tracked.blob.area,
                    perimeter: tracked.blob.perimeter,
                });
            }
        }

        if let (Some(dir), Some(counter)) = (&cli.annotated, &counter) {
            save_annotated(counter, &dir.join(&file).with_extension("png"))?;
        }
    }

    let tally = counter.map(|c| c.tally().clone()).unwrap_or_default();
    let report = RunReport {
        frames: paths.len(),
        total_value: tally.total_value(),
        tally,
        events,
        skipped,
    };
    let json = serde_json::to_string_pretty(&report).map_err(CliError::Report)?;
    match &cli.report {
        Some(path) => fs::write(path, json).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?,
        None => println!("{json}"),
    }
    Ok(())
}

/// Decode one frame and run it through the counter, which is sized by the
/// first frame that decodes.
fn process(
    counter: &mut Option<CoinCounter>,
    path: &Path,
    params: &CoinCounterParams,
) -> Result<FrameReport, CliError> {
    let frame = load_frame(path).map_err(|source| CliError::Frame {
        path: path.to_path_buf(),
        source,
    })?;
    let pipeline_err = |source| CliError::Pipeline {
        path: path.to_path_buf(),
        source,
    };

    let ready = match counter.take() {
        Some(ready) => ready,
        None => CoinCounter::new(frame.width(), frame.height(), params.clone())
            .map_err(pipeline_err)?,
    };
    counter.insert(ready).process_frame(&frame).map_err(pipeline_err)
}

fn read_to_string(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let entries = fs::read_dir(dir).map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(CliError::NoFrames(dir.to_path_buf()));
    }
    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn save_annotated(counter: &CoinCounter, path: &Path) -> Result<(), CliError> {
    let Some(rgb) = rgb_from_frame(counter.canvas()) else {
        return Ok(());
    };
    rgb.save(path).map_err(|source| CliError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
