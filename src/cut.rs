use crate::ffmpeg::{FFmpegTools, run_ffmpeg};
use crate::filter::{audio_filter, build_between_expression, video_filter};
use crate::timeframe::{CutError, Interval};

/// Everything needed to run a single cut.
#[derive(Debug)]
pub struct CutPlan {
    pub input: String,
    pub output: String,
    pub ranges: Vec<Interval>,
    pub video_filter: String,
    pub audio_filter: String,
}

impl CutPlan {
    /// Fails with `EmptySelection` when there is nothing to keep.
    pub fn new(input: &str, output: &str, ranges: Vec<Interval>) -> Result<Self, CutError> {
        let expression = build_between_expression(&ranges)?;
        Ok(Self {
            input: input.to_string(),
            output: output.to_string(),
            video_filter: video_filter(&expression),
            audio_filter: audio_filter(&expression),
            ranges,
        })
    }

    /// Total kept length in seconds.
    pub fn kept_seconds(&self) -> u64 {
        self.ranges.iter().map(Interval::len).sum()
    }

    /// Arguments passed to ffmpeg, without the program name.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        [
            "-y",
            "-i",
            self.input.as_str(),
            "-vf",
            self.video_filter.as_str(),
            "-af",
            self.audio_filter.as_str(),
            self.output.as_str(),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    pub fn apply(&self, tools: &FFmpegTools, debug: bool) -> anyhow::Result<()> {
        run_ffmpeg(tools, &self.ffmpeg_args(), debug)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_builds_both_filters_from_same_ranges() {
        let plan = CutPlan::new(
            "in.mp4",
            "out.mp4",
            vec![Interval::new(0, 10), Interval::new(20, 30)],
        )
        .unwrap();
        assert_eq!(
            plan.video_filter,
            "select='between(t,0,10)+between(t,20,30)',setpts=N/FRAME_RATE/TB"
        );
        assert_eq!(
            plan.audio_filter,
            "aselect='between(t,0,10)+between(t,20,30)',asetpts=N/SR/TB"
        );
        assert_eq!(plan.kept_seconds(), 20);
    }

    #[test]
    fn test_ffmpeg_args() {
        let plan = CutPlan::new("in.mp4", "out.mp4", vec![Interval::new(5, 6)]).unwrap();
        assert_eq!(
            plan.ffmpeg_args(),
            vec![
                "-y",
                "-i",
                "in.mp4",
                "-vf",
                "select='between(t,5,6)',setpts=N/FRAME_RATE/TB",
                "-af",
                "aselect='between(t,5,6)',asetpts=N/SR/TB",
                "out.mp4",
            ]
        );
    }

    #[test]
    fn test_empty_plan_is_rejected() {
        let err = CutPlan::new("in.mp4", "out.mp4", Vec::new()).unwrap_err();
        assert!(matches!(err, CutError::EmptySelection));
    }
}
