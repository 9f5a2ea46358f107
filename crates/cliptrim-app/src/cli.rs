use clap::Parser;
use cliptrim_media::{ExportFormat, Quality};
use std::path::PathBuf;

/// Trim a video to an in/out window and export it
#[derive(Parser, Debug)]
#[command(name = "cliptrim", author, version, about, long_about = None)]
pub struct Args {
    /// Video file to trim
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Window start (HH:MM:SS:FF, HH:MM:SS.mmm, HH:MM:SS or seconds)
    #[arg(long = "in", value_name = "TIME")]
    pub in_point: Option<String>,

    /// Window end; defaults to the end of the file
    #[arg(long = "out", value_name = "TIME")]
    pub out_point: Option<String>,

    /// Output container (mp4, webm, mov, mkv, avi)
    #[arg(short = 'f', long = "format", value_name = "FORMAT", value_parser = parse_format)]
    pub format: Option<ExportFormat>,

    /// Quality from 1 to 100
    #[arg(short = 'q', long = "quality", value_name = "1-100", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Output path; defaults to a name derived from the input and window
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Config file (default: <config dir>/cliptrim/config.json)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn quality(&self) -> Option<Quality> {
        self.quality.map(Quality::new)
    }
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: cliptrim_core::CliptrimError| e.to_string())
}
