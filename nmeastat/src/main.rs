use std::{io::Write, path::Path};

use anyhow::{bail, Context, Result};
use args::{parse_args, Args};
use clap::builder::styling::AnsiColor;
use env_logger::Builder;
use log::{debug, error, info, warn};
use logging_timer::time;
use nmeastat_core::{
    classify::is_commute_track,
    config::StatsConfig,
    geometry::calc_bounding_box,
    read::read_track_from_file,
    speed::extract_avg_mph,
    stats::{calculate_track_statistics, report_timing_stats},
    Track,
};
use report::write_split_report;

mod args;
mod report;

pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

#[time]
fn main() -> Result<()> {
    configure_logging();
    info!("Starting {PROGRAM_NAME}");

    let args = parse_args();
    debug!("{:?}", &args);

    if args.files.is_empty() {
        warn!("No track files specified, exiting");
        return Ok(());
    }

    let config = load_config(&args)?;
    debug!("{:?}", &config);

    let mut num_failed = 0;
    for f in &args.files {
        if let Err(e) = process_file(f, &args, &config) {
            error!("Failed to process {:?}: {e:#}", f);
            num_failed += 1;
        }
    }

    if num_failed > 0 {
        bail!("{num_failed} of {} files could not be processed", args.files.len());
    }

    Ok(())
}

/// The config file (if any) with the command line overrides applied.
fn load_config(args: &Args) -> Result<StatsConfig> {
    let mut config = match &args.config {
        Some(path) => StatsConfig::load_from_file(path)?,
        None => StatsConfig::default(),
    };

    if let Some(vanity_factor) = args.vanity_factor {
        config.vanity_factor = vanity_factor;
    }

    config.validate().context("Invalid configuration")?;

    if let Some(metres) = args.split_metres {
        if !metres.is_finite() || metres <= 0.0 {
            bail!("--split-metres must be a positive number of metres, got {metres}");
        }
    }

    if config.vanity_factor != 1.0 {
        info!("Paces will be scaled by a vanity factor of {}", config.vanity_factor);
    }

    Ok(config)
}

fn process_file(input_file: &Path, args: &Args, config: &StatsConfig) -> Result<()> {
    let track = read_track_from_file(input_file)?;
    let track = trim_track(track, args.start, args.end)?;

    report_timing_stats(&track)?;

    let bbox = calc_bounding_box(&track)?;
    info!(
        "Mean position ({:.6}, {:.6}), span {:.6} x {:.6} degrees",
        bbox.mean_lat, bbox.mean_long, bbox.lat_span, bbox.long_span
    );

    let avg_mph = extract_avg_mph(&track)?;
    let is_commute = is_commute_track(&bbox, avg_mph, &config.commute);

    let split_distance_metres = match args.split_metres {
        Some(metres) => metres,
        None if is_commute => config.commute_split_metres,
        None => config.workout_split_metres,
    };

    info!(
        "{:?} looks like a {}, splitting every {split_distance_metres}m",
        input_file,
        if is_commute { "commute" } else { "workout" }
    );

    let stats = calculate_track_statistics(&track, split_distance_metres, config)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", input_file.display())?;
    write_split_report(&mut stdout, &stats)?;

    Ok(())
}

/// Applies the --start and --end options. The end is exclusive and defaults
/// to the end of the track.
fn trim_track(track: Track, start: usize, end: Option<usize>) -> Result<Track> {
    let end = end.unwrap_or(track.len());
    if start == 0 && end == track.len() {
        return Ok(track);
    }

    info!("Using records {start}..{end} of {}", track.len());
    Ok(track.slice(start, end)?)
}

fn configure_logging() {
    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let level_style = buf.default_level_style(record.level());
        let level_style = match record.level() {
            log::Level::Error => level_style.fg_color(Some(AnsiColor::Red.into())),
            log::Level::Warn => level_style.fg_color(Some(AnsiColor::Yellow.into())),
            log::Level::Info => level_style.fg_color(Some(AnsiColor::Green.into())),
            log::Level::Debug => level_style.fg_color(Some(AnsiColor::Blue.into())),
            log::Level::Trace => level_style.fg_color(Some(AnsiColor::Magenta.into())),
        };

        let line_number_style = buf
            .default_level_style(record.level())
            .fg_color(Some(AnsiColor::Cyan.into()));

        match (record.file(), record.line()) {
            (Some(file), Some(line)) => writeln!(
                buf,
                "[{} {level_style}{}{level_style:#} {}/{line_number_style}{}{line_number_style:#}] {}",
                buf.timestamp(),
                record.level(),
                file,
                line,
                record.args()
            ),
            (Some(file), None) => writeln!(
                buf,
                "[{} {level_style}{}{level_style:#} {}] {}",
                buf.timestamp(),
                record.level(),
                file,
                record.args()
            ),
            (None, _) => writeln!(
                buf,
                "[{} {level_style}{}{level_style:#}] {}",
                buf.timestamp(),
                record.level(),
                record.args()
            ),
        }
    });

    builder.init();
}
