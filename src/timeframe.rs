use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{duration_seconds, parse_time};

#[derive(Debug, Error)]
pub enum CutError {
    #[error("cannot parse time `{expression}`, expected `start`, `end` or a literal like `1hr30m15s`")]
    Parse { expression: String },
    #[error("time `{expression}` is too large")]
    Overflow { expression: String },
    #[error("invalid `{endpoint}` time in range #{}", .index + 1)]
    Endpoint {
        index: usize,
        endpoint: &'static str,
        #[source]
        source: Box<CutError>,
    },
    #[error("no time ranges declared")]
    EmptyTimeframe,
    #[error("nothing left to keep: the selection is empty")]
    EmptySelection,
    #[error("range #{} {reason}", .index + 1)]
    Precondition { index: usize, reason: String },
}

/// How the declared ranges are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CutMethod {
    /// Declared ranges are kept.
    #[default]
    Select,
    /// Declared ranges are removed, everything else is kept.
    Delete,
}

/// A time range as written by the user, endpoints not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RangePair {
    pub from: String,
    pub to: String,
}

impl RangePair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A resolved range in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

/// Resolve both endpoints of every pair, preserving declaration order.
pub fn normalize(pairs: &[RangePair], duration: f64) -> Result<Vec<Interval>, CutError> {
    pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| -> Result<Interval, CutError> {
            let endpoint = |endpoint: &'static str, expression: &str| {
                parse_time(expression, duration).map_err(|e| CutError::Endpoint {
                    index,
                    endpoint,
                    source: Box::new(e),
                })
            };
            Ok(Interval::new(
                endpoint("from", &pair.from)?,
                endpoint("to", &pair.to)?,
            ))
        })
        .collect()
}

/// Check that ranges are well formed, sorted and non-overlapping.
pub fn validate(intervals: &[Interval], duration: f64) -> Result<(), CutError> {
    let duration = duration_seconds(duration);
    let violation = |index: usize, reason: String| -> Result<(), CutError> {
        Err(CutError::Precondition { index, reason })
    };

    for (index, interval) in intervals.iter().enumerate() {
        if interval.start > interval.end {
            return violation(
                index,
                format!("starts after it ends ({}s > {}s)", interval.start, interval.end),
            );
        }
        if interval.end > duration {
            return violation(
                index,
                format!("ends after the media ({}s > {}s)", interval.end, duration),
            );
        }
        if index > 0 {
            let previous = intervals[index - 1];
            if previous.end > interval.start {
                return violation(
                    index,
                    format!(
                        "starts at {}s, before the previous range ends at {}s",
                        interval.start, previous.end
                    ),
                );
            }
        }
    }
    Ok(())
}

/// Compute the ranges to keep when `deleted` lists the ranges to remove.
///
/// `deleted` must be sorted and non-overlapping. Touching boundaries never produce
/// zero-width output: a zero-width first range and a zero-width gap between two
/// ranges both grow by one second.
pub fn invert(deleted: &[Interval], duration: f64) -> Result<Vec<Interval>, CutError> {
    let Some(&first) = deleted.first() else {
        return Err(CutError::EmptyTimeframe);
    };
    let duration = duration_seconds(duration);

    let mut kept = Vec::with_capacity(deleted.len() + 1);
    if first.start != 0 {
        kept.push(Interval::new(0, first.start));
    }

    let mut ranges = deleted.to_vec();
    if first.start == first.end {
        ranges[0] = Interval::new(first.start, first.end.saturating_add(1));
    }

    for pair in ranges.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        let end = if current.end == next.start {
            next.start.saturating_add(1)
        } else {
            next.start
        };
        kept.push(Interval::new(current.end, end));
    }

    if let Some(last) = ranges.last()
        && last.end < duration
    {
        kept.push(Interval::new(last.end, duration));
    }

    Ok(kept)
}

/// Turn the declared pairs into the final list of ranges to keep.
///
/// With `strict`, precondition violations abort; otherwise they are only logged.
pub fn resolve_timeframe(
    pairs: &[RangePair],
    method: CutMethod,
    duration: f64,
    strict: bool,
) -> Result<Vec<Interval>, CutError> {
    if pairs.is_empty() {
        return Err(CutError::EmptyTimeframe);
    }

    let intervals = normalize(pairs, duration)?;
    debug!("Declared ranges: {:?}", intervals);

    if let Err(e) = validate(&intervals, duration) {
        if strict {
            return Err(e);
        }
        warn!("{e}");
    }

    let kept = match method {
        CutMethod::Select => intervals,
        CutMethod::Delete => invert(&intervals, duration)?,
    };
    debug!("Ranges to keep: {:?}", kept);
    Ok(kept)
}
