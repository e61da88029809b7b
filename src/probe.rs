use log::debug;
use std::process::Command;

use crate::ffmpeg::{FFmpegError, FFmpegTools};

#[derive(Debug, PartialEq)]
pub struct MediaStream {
    pub index: usize,
    pub kind: String,
    pub codec: String,
    pub duration: String,
    pub details: String,
}

/// Get the container duration of `input` in seconds.
pub fn probe_duration(tools: &FFmpegTools, input: &str) -> Result<f64, FFmpegError> {
    let output = Command::new(&tools.ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            input,
        ])
        .output()
        .map_err(|e| FFmpegError::DurationUnavailable {
            input: input.to_string(),
            reason: format!("could not run {}: {}", tools.ffprobe, e),
        })?;

    if !output.status.success() {
        return Err(FFmpegError::DurationUnavailable {
            input: input.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let duration = parse_duration(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        FFmpegError::DurationUnavailable {
            input: input.to_string(),
            reason: format!(
                "unexpected ffprobe output `{}`",
                String::from_utf8_lossy(&output.stdout).trim()
            ),
        }
    })?;
    debug!("Duration of {}: {}s", input, duration);
    Ok(duration)
}

fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// List every stream of `input` with its type, codec and duration.
pub fn inspect_streams(tools: &FFmpegTools, input: &str) -> Result<Vec<MediaStream>, FFmpegError> {
    let output = Command::new(&tools.ffprobe)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
            input,
        ])
        .output()?;

    if !output.status.success() {
        return Err(FFmpegError::CommandFailed(
            "inspect_streams".to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    Ok(streams_from_json(&parsed))
}

fn streams_from_json(parsed: &serde_json::Value) -> Vec<MediaStream> {
    let file_duration = parsed["format"]["duration"].as_str();

    let mut streams = Vec::new();
    if let Some(stream_array) = parsed["streams"].as_array() {
        for stream in stream_array {
            let index = stream["index"].as_u64().unwrap_or(0) as usize;
            let kind = stream["codec_type"]
                .as_str()
                .unwrap_or("unknown")
                .to_string();
            let codec = stream["codec_name"]
                .as_str()
                .unwrap_or("unknown")
                .to_string();

            let duration = stream["duration"]
                .as_str()
                .or(file_duration)
                .and_then(|d| d.parse::<f64>().ok())
                .map(|d| format!("{:.3} s", d))
                .unwrap_or_else(|| "unknown".to_string());

            let details = match kind.as_str() {
                "video" => match (stream["width"].as_u64(), stream["height"].as_u64()) {
                    (Some(w), Some(h)) => match stream["avg_frame_rate"].as_str() {
                        Some(rate) if rate != "0/0" => format!("{}x{} @ {}", w, h, rate),
                        _ => format!("{}x{}", w, h),
                    },
                    _ => "-".to_string(),
                },
                "audio" => match (stream["channels"].as_u64(), stream["sample_rate"].as_str()) {
                    (Some(ch), Some(sr)) => format!("{} ch, {} Hz", ch, sr),
                    (Some(ch), None) => format!("{} ch", ch),
                    _ => "-".to_string(),
                },
                _ => "-".to_string(),
            };

            streams.push(MediaStream {
                index,
                kind,
                codec,
                duration,
                details,
            });
        }
    }
    streams
}
