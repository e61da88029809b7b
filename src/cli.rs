use clap::Parser;

use crate::timeframe::{CutMethod, RangePair};

/// Cut media files with ffmpeg from a list of time ranges to keep or delete
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to a JSON profile describing the cut (input, output, cut_method, timeframe). CLI arguments override values in the profile.
    #[arg(short = 'p', long)]
    pub profile: Option<String>,

    /// Input media file (any FFmpeg-supported format)
    #[arg(short = 'i', long)]
    pub input: Option<String>,

    /// Output media file (any FFmpeg-supported format)
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Whether the ranges are kept (select) or removed (delete)
    #[arg(short = 'm', long, value_enum)]
    pub cut_method: Option<CutMethod>,

    /// Time range in format <from>:<to>, e.g. 1m30s:2m or start:45s or 1hr:end
    #[arg(short = 'r', long = "range", value_parser = parse_range, num_args = 1..)]
    pub ranges: Vec<RangePair>,

    /// Reject ranges that are reversed, overlapping, unsorted or past the end of the media
    #[arg(long)]
    pub strict: bool,

    /// Do not run ffmpeg, just show the command
    #[arg(long)]
    pub show_command: bool,

    /// Show ffmpeg logs.
    #[arg(short = 'g', long)]
    pub debug: bool,

    /// Ignore ffmpeg version check.
    #[arg(long)]
    pub ignore_ffmpeg_version: bool,

    /// Check FFmpeg installation and version compatibility.
    #[arg(short = 'c', long)]
    pub check_ffmpeg: bool,

    /// Inspect input file and show all streams in a table
    #[arg(short = 'I', long)]
    pub inspect: bool,

    /// Write the merged profile to this file as JSON. If no file is provided, the input file name (without extension) will be used with .json.
    #[arg(short = 'w', long = "write-profile", num_args = 0..=1, value_name = "FILE")]
    pub write_profile: Option<Option<String>>,

    /// Automatically confirm the cutting plan and proceed without prompting
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// ffmpeg executable to run
    #[arg(long, default_value = "ffmpeg", value_name = "PATH")]
    pub ffmpeg: String,

    /// ffprobe executable to run
    #[arg(long, default_value = "ffprobe", value_name = "PATH")]
    pub ffprobe: String,
}

fn parse_range(s: &str) -> Result<RangePair, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(format!("invalid format: '{}', expected <from>:<to>", s));
    }
    Ok(RangePair::new(parts[0], parts[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(
            parse_range("1m30s:end").unwrap(),
            RangePair::new("1m30s", "end")
        );
        assert!(parse_range("1m30s").is_err());
        assert!(parse_range("1m:2m:3m").is_err());
        assert!(parse_range(":2m").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "ffcut", "-i", "in.mp4", "-o", "out.mp4", "-m", "delete", "-r", "start:10s", "1m:end",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some("in.mp4"));
        assert_eq!(args.cut_method, Some(CutMethod::Delete));
        assert_eq!(
            args.ranges,
            vec![RangePair::new("start", "10s"), RangePair::new("1m", "end")]
        );
        assert_eq!(args.ffmpeg, "ffmpeg");
        assert!(args.write_profile.is_none());
    }

    #[test]
    fn test_write_profile_without_value() {
        let args = Args::try_parse_from(["ffcut", "-i", "in.mp4", "-w"]).unwrap();
        assert_eq!(args.write_profile, Some(None));
    }
}
