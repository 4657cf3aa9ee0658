use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use stimpos_lib::{
    io::{csv as csv_io, text as text_io},
    segment::{segment_square, segment_triangle, Segmentation},
    signal::StimulusTrace,
    unwrap::unwrap,
    Config, UnwrapConfig,
};
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "stimpos",
    version,
    about = "Segment stimulus-position recordings into trial and cycle regions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove wrap-around jumps from newline-delimited samples (stdin or --input)
    Unwrap {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value_t = stimpos_lib::DEFAULT_DISCONT)]
        discont: f64,
        /// Print newline-delimited values instead of a JSON array
        #[arg(long)]
        text: bool,
    },
    /// Segment a square-wave stimulus by its excursions above threshold
    SegmentSquare {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Overrides [square].threshold from --config
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print full boolean masks instead of index ranges
        #[arg(long)]
        masks: bool,
    },
    /// Segment a triangle-wave stimulus around its midpoint crossings
    SegmentTriangle {
        /// Newline-delimited voltage, sampled uniformly at --fs
        #[arg(long, conflicts_with = "csv")]
        input: Option<PathBuf>,
        /// Delimited file with time and voltage columns
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, default_value = "time")]
        time_col: String,
        #[arg(long, default_value = "volt")]
        volt_col: String,
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        #[arg(long, default_value_t = 10000.0)]
        fs: f64,
        #[arg(long)]
        lower: Option<f64>,
        #[arg(long)]
        upper: Option<f64>,
        #[arg(long)]
        window_width: Option<f64>,
        #[arg(long)]
        window_min_len: Option<usize>,
        /// Place thresholds this fraction of the voltage range inside the extrema
        #[arg(long, conflicts_with_all = ["lower", "upper"])]
        auto_thresholds: Option<f64>,
        /// Unwrap the voltage before segmenting
        #[arg(long)]
        unwrap: bool,
        #[arg(long)]
        discont: Option<f64>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        masks: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Unwrap {
            input,
            discont,
            text,
        } => cmd_unwrap(input.as_deref(), discont, text)?,
        Commands::SegmentSquare {
            input,
            threshold,
            config,
            masks,
        } => cmd_segment_square(input.as_deref(), threshold, config.as_deref(), masks)?,
        Commands::SegmentTriangle {
            input,
            csv,
            time_col,
            volt_col,
            delimiter,
            fs,
            lower,
            upper,
            window_width,
            window_min_len,
            auto_thresholds,
            unwrap,
            discont,
            config,
            masks,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if unwrap || discont.is_some() {
                let base = cfg.unwrap.unwrap_or_default();
                cfg.unwrap = Some(UnwrapConfig {
                    discont: discont.unwrap_or(base.discont),
                });
            }
            if let Some(v) = lower {
                cfg.triangle.lower_threshold = v;
            }
            if let Some(v) = upper {
                cfg.triangle.upper_threshold = v;
            }
            if let Some(v) = window_width {
                cfg.triangle.midpoint_window_width = v;
            }
            if let Some(v) = window_min_len {
                cfg.triangle.midpoint_window_min_len = v;
            }
            let trace = match csv.as_deref() {
                Some(path) => {
                    let delimiter = u8::try_from(delimiter)
                        .map_err(|_| anyhow!("delimiter must be a single byte: {:?}", delimiter))?;
                    csv_io::read_trace_csv(path, &time_col, &volt_col, delimiter)?
                }
                None => StimulusTrace::from_uniform(fs, read_samples(input.as_deref())?)?,
            };
            cmd_segment_triangle(trace, cfg, auto_thresholds, masks)?
        }
    }
    Ok(())
}

fn read_samples(input: Option<&Path>) -> Result<Vec<f64>> {
    match input {
        Some(path) => text_io::read_f64_series(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_f64_series(&buf)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn print_segmentation(seg: &Segmentation, masks: bool) -> Result<()> {
    log::info!(
        "{} cycles, trial starts at sample {} of {}",
        seg.cycles.len(),
        seg.trial.start,
        seg.len
    );
    if masks {
        print_json(&seg.masks())
    } else {
        print_json(seg)
    }
}

fn cmd_unwrap(input: Option<&Path>, discont: f64, text: bool) -> Result<()> {
    UnwrapConfig { discont }.validate()?;
    let samples = read_samples(input)?;
    let unwrapped = unwrap(&samples, discont);
    if text {
        print!("{}", text_io::format_f64_series(&unwrapped));
        Ok(())
    } else {
        print_json(&unwrapped)
    }
}

fn cmd_segment_square(
    input: Option<&Path>,
    threshold: Option<f64>,
    config: Option<&Path>,
    masks: bool,
) -> Result<()> {
    let mut cfg = load_config(config)?;
    if let Some(threshold) = threshold {
        cfg.square.threshold = threshold;
    }
    let mut volt = read_samples(input)?;
    if let Some(u) = &cfg.unwrap {
        u.validate()?;
        volt = unwrap(&volt, u.discont);
    }
    let out = segment_square(&volt, &cfg.square)?;
    print_segmentation(&out.segmentation, masks)
}

fn cmd_segment_triangle(
    mut trace: StimulusTrace,
    mut cfg: Config,
    auto_thresholds: Option<f64>,
    masks: bool,
) -> Result<()> {
    if let Some(u) = &cfg.unwrap {
        u.validate()?;
        trace = trace.unwrapped(u.discont);
    }
    if let Some(fraction) = auto_thresholds {
        cfg.triangle = cfg.triangle.with_auto_thresholds(trace.volt(), fraction);
        log::debug!(
            "auto thresholds: [{}, {}]",
            cfg.triangle.lower_threshold,
            cfg.triangle.upper_threshold
        );
    }
    let seg = segment_triangle(&trace, &cfg.triangle)?;
    print_segmentation(&seg, masks)
}
