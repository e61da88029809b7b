use crate::timeframe::{CutError, Interval};

/// Render the ranges to keep as a `select` predicate over `t`.
///
/// Terms are joined with `+`, which acts as a logical OR in ffmpeg expressions.
pub fn build_between_expression(ranges: &[Interval]) -> Result<String, CutError> {
    if ranges.is_empty() {
        return Err(CutError::EmptySelection);
    }
    Ok(ranges
        .iter()
        .map(|r| format!("between(t,{},{})", r.start, r.end))
        .collect::<Vec<_>>()
        .join("+"))
}

/// Video filter keeping the frames matched by `expression` and closing the gaps.
pub fn video_filter(expression: &str) -> String {
    format!("select='{}',setpts=N/FRAME_RATE/TB", expression)
}

/// Audio filter keeping the samples matched by `expression` and closing the gaps.
pub fn audio_filter(expression: &str) -> String {
    format!("aselect='{}',asetpts=N/SR/TB", expression)
}
