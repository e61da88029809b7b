use log::debug;
use regex::Regex;
use std::{
    io,
    process::{Command, Stdio},
};
use thiserror::Error;

const MINIMUM_FFMPEG_MAJOR_VERSION: u32 = 4;
const REQUIRED_FILTERS: [&str; 2] = ["select", "aselect"];

/// Locations of the external tools. Passed explicitly to every helper that spawns one.
#[derive(Debug, Clone)]
pub struct FFmpegTools {
    pub ffmpeg: String,
    pub ffprobe: String,
}

#[derive(Debug)]
pub struct FFmpegVersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub is_compatible: bool,
}

#[derive(Debug)]
pub struct FFmpegCheckResult {
    pub ffmpeg_available: bool,
    pub ffmpeg_version: Option<FFmpegVersionInfo>,
    pub ffprobe_available: bool,
    pub missing_filters: Vec<&'static str>,
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum FFmpegError {
    #[error(
        "FFmpeg v{found_major}.{found_minor} is too old, v{minimum_major} or newer is required. Use --ignore-ffmpeg-version to bypass."
    )]
    VersionTooOld {
        minimum_major: u32,
        found_major: u32,
        found_minor: u32,
    },
    #[error("Could not parse ffmpeg version from output. Use --ignore-ffmpeg-version to bypass.")]
    VersionParseError,
    #[error("Could not run `{0} -version` to check version.")]
    FFmpegVersionCheckFailed(String),
    #[error("`{0}` command not found. Please ensure it is installed and in your PATH.")]
    CommandNotFound(String),
    #[error("Failed to run `{0}`: {1}")]
    CommandFailed(String, String),
    #[error("Could not determine the duration of {input}: {reason}")]
    DurationUnavailable { input: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub fn run_ffmpeg(tools: &FFmpegTools, args: &[String], debug: bool) -> Result<(), FFmpegError> {
    debug!("Running {} {:?}", tools.ffmpeg, args);
    let mut command = Command::new(&tools.ffmpeg);
    command.args(args);

    if !debug {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let status = command.status().map_err(|e| not_found_or(&tools.ffmpeg, e))?;
    if !status.success() {
        return Err(FFmpegError::CommandFailed(
            args.join(" "),
            format!("FFmpeg failed ({})", status),
        ));
    }
    Ok(())
}

pub fn check_ffmpeg_version(tools: &FFmpegTools, ignore_check: bool) -> Result<(), FFmpegError> {
    if ignore_check {
        return Ok(());
    }

    let output = Command::new(&tools.ffmpeg)
        .arg("-version")
        .output()
        .map_err(|e| not_found_or(&tools.ffmpeg, e))?;
    if !output.status.success() {
        return Err(FFmpegError::FFmpegVersionCheckFailed(tools.ffmpeg.clone()));
    }

    let version_info = String::from_utf8_lossy(&output.stdout);
    let (major, minor, _) = parse_ffmpeg_version(&version_info)?;
    if major >= MINIMUM_FFMPEG_MAJOR_VERSION {
        Ok(())
    } else {
        Err(FFmpegError::VersionTooOld {
            minimum_major: MINIMUM_FFMPEG_MAJOR_VERSION,
            found_major: major,
            found_minor: minor,
        })
    }
}

/// Extract `(major, minor, patch)` from `ffmpeg -version` output.
pub fn parse_ffmpeg_version(version_info: &str) -> Result<(u32, u32, u32), FFmpegError> {
    let re = Regex::new(r"ffmpeg version n?(\d+)\.(\d+)(?:\.(\d+))?")?;
    let caps = re
        .captures(version_info)
        .ok_or(FFmpegError::VersionParseError)?;
    let major: u32 = caps
        .get(1)
        .ok_or(FFmpegError::VersionParseError)?
        .as_str()
        .parse()?;
    let minor: u32 = caps
        .get(2)
        .ok_or(FFmpegError::VersionParseError)?
        .as_str()
        .parse()?;
    let patch: u32 = caps.get(3).map_or(Ok(0), |m| m.as_str().parse())?;
    Ok((major, minor, patch))
}

pub fn check_dependency(cmd: &str) -> Result<(), FFmpegError> {
    match Command::new(cmd)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(e) => Err(not_found_or(cmd, e)),
    }
}

pub fn check_ffmpeg_installation(tools: &FFmpegTools) -> FFmpegCheckResult {
    let mut result = FFmpegCheckResult {
        ffmpeg_available: false,
        ffmpeg_version: None,
        ffprobe_available: false,
        missing_filters: REQUIRED_FILTERS.to_vec(),
        error: None,
    };

    match Command::new(&tools.ffmpeg).arg("-version").output() {
        Ok(output) => {
            if output.status.success() {
                result.ffmpeg_available = true;

                let version_info = String::from_utf8_lossy(&output.stdout);
                if let Ok((major, minor, patch)) = parse_ffmpeg_version(&version_info) {
                    result.ffmpeg_version = Some(FFmpegVersionInfo {
                        major,
                        minor,
                        patch,
                        is_compatible: major >= MINIMUM_FFMPEG_MAJOR_VERSION,
                    });
                }
            }
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                result.error = Some(format!("{} not found", tools.ffmpeg));
            } else {
                result.error = Some(format!("Failed to check FFmpeg: {}", e));
            }
        }
    }

    result.ffprobe_available = Command::new(&tools.ffprobe)
        .arg("-version")
        .output()
        .is_ok_and(|output| output.status.success());

    if let Ok(output) = Command::new(&tools.ffmpeg)
        .args(["-hide_banner", "-filters"])
        .output()
    {
        let filters = String::from_utf8_lossy(&output.stdout);
        result.missing_filters = missing_filters(&filters);
    }

    result
}

/// Required filters absent from `ffmpeg -filters` output.
fn missing_filters(filters: &str) -> Vec<&'static str> {
    REQUIRED_FILTERS
        .into_iter()
        .filter(|name| {
            !filters
                .lines()
                .any(|line| line.split_whitespace().nth(1) == Some(*name))
        })
        .collect()
}

fn not_found_or(cmd: &str, e: io::Error) -> FFmpegError {
    if e.kind() == io::ErrorKind::NotFound {
        FFmpegError::CommandNotFound(cmd.to_string())
    } else {
        FFmpegError::CommandFailed(cmd.to_string(), e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_version() {
        let out = "ffmpeg version 7.1.1 Copyright (c) 2000-2025 the FFmpeg developers\n";
        assert_eq!(parse_ffmpeg_version(out).unwrap(), (7, 1, 1));
    }

    #[test]
    fn test_parse_version_without_patch() {
        let out = "ffmpeg version n6.0 Copyright (c) 2000-2023 the FFmpeg developers";
        assert_eq!(parse_ffmpeg_version(out).unwrap(), (6, 0, 0));
    }

    #[test]
    fn test_parse_git_build_fails() {
        let out = "ffmpeg version N-113456-gabcdef Copyright (c) 2000-2024";
        assert!(matches!(
            parse_ffmpeg_version(out),
            Err(FFmpegError::VersionParseError)
        ));
    }

    #[test]
    fn test_missing_filters() {
        let listing = " ... select            V->V       Select video frames to pass in output.\n \
                       ... aselect           A->N       Select audio frames to pass in output.\n";
        assert!(missing_filters(listing).is_empty());

        let listing = " ... aselect           A->N       Select audio frames to pass in output.\n";
        assert_eq!(missing_filters(listing), vec!["select"]);
    }
}
