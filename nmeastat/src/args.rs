use std::path::PathBuf;

use clap::{value_parser, Parser};

/*
 FULL SYNTAX
 ===========
 [--config=FILE] [--start=N] [--end=N] [--split-metres=M] [--vanity-factor=F] FILES

 --config          JSON file of settings, anything not mentioned keeps its default
 --start, --end    only look at records start..end of each file
 --split-metres    split every M metres instead of choosing commute/workout splits
 --vanity-factor   scale every pace by F, overriding the config file
*/

/// Returns the parsed command line options. Uses the 'wild' crate to do glob
/// expansion on Windows. so that Windows and Linux behave identically.
pub fn parse_args() -> Args {
    Args::parse_from(wild::args())
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, help = "Read settings from this JSON file")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        default_value = "0",
        help = "Index of the first record to use from each file"
    )]
    pub start: usize,

    #[arg(
        short,
        long,
        help = "Index one past the last record to use from each file. Defaults to the end of the file."
    )]
    pub end: Option<usize>,

    #[arg(
        long,
        help = "Split every METRES instead of using the commute or workout split distance",
        value_parser = value_parser!(f64)
    )]
    pub split_metres: Option<f64>,

    #[arg(
        short,
        long,
        help = "Multiply every pace by this before printing it. 1.0 leaves paces alone."
    )]
    pub vanity_factor: Option<f64>,

    #[arg(help = "List of track files to process, one comma-separated record per line.")]
    pub files: Vec<PathBuf>,
}
