use regex::Regex;
use std::sync::LazyLock;

use crate::timeframe::CutError;

const SECONDS_PER_DAY: u64 = 86_400;

/// Symbolic marker for the first second of the media.
pub const START: &str = "start";
/// Symbolic marker for the total duration of the media.
pub const END: &str = "end";

static LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<hours>\d+)hr)?(?:(?P<minutes>\d+)m)?(?:(?P<seconds>\d+)s)?$").unwrap()
});

/// Convert a time expression into whole seconds.
///
/// Accepts the markers `start` and `end`, or a literal made of optional
/// `<n>hr`, `<n>m` and `<n>s` components in that order (e.g. `1hr30m15s`, `45m`, `90s`).
/// Literals wrap at one day, so `25hr` resolves to one hour; `end` is never wrapped.
pub fn parse_time(expression: &str, duration: f64) -> Result<u64, CutError> {
    match expression {
        START => return Ok(0),
        END => return Ok(duration_seconds(duration)),
        _ => {}
    }

    let caps = LITERAL.captures(expression).ok_or_else(|| parse_error(expression))?;

    let components = [("hours", 3_600u64), ("minutes", 60), ("seconds", 1)];
    let mut total = 0u64;
    let mut matched = 0;
    for (name, scale) in components {
        let Some(value) = caps.name(name) else {
            continue;
        };
        matched += 1;
        let value: u64 = value
            .as_str()
            .parse()
            .map_err(|_| overflow_error(expression))?;
        total = value
            .checked_mul(scale)
            .and_then(|v| v.checked_add(total))
            .ok_or_else(|| overflow_error(expression))?;
    }

    if matched == 0 {
        return Err(parse_error(expression));
    }

    Ok(total % SECONDS_PER_DAY)
}

/// Whole seconds of a probed duration, truncated toward zero.
pub fn duration_seconds(duration: f64) -> u64 {
    if duration.is_finite() && duration > 0.0 {
        duration.trunc() as u64
    } else {
        0
    }
}

fn parse_error(expression: &str) -> CutError {
    CutError::Parse {
        expression: expression.to_string(),
    }
}

fn overflow_error(expression: &str) -> CutError {
    CutError::Overflow {
        expression: expression.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1hr30m15s", 5415)]
    #[case("1hr", 3600)]
    #[case("45m", 2700)]
    #[case("90s", 90)]
    #[case("2m5s", 125)]
    #[case("1hr7s", 3607)]
    #[case("0s", 0)]
    #[case("120m", 7200)]
    fn test_parse_literal(#[case] expression: &str, #[case] expected: u64) {
        assert_eq!(parse_time(expression, 10_000.0).unwrap(), expected);
    }

    #[test]
    fn test_parse_markers() {
        assert_eq!(parse_time("start", 120.0).unwrap(), 0);
        assert_eq!(parse_time("end", 120.0).unwrap(), 120);
        assert_eq!(parse_time("end", 120.9).unwrap(), 120);
    }

    #[test]
    fn test_end_is_not_wrapped() {
        assert_eq!(parse_time("end", 90_000.0).unwrap(), 90_000);
    }

    #[rstest]
    #[case("25hr", 3600)]
    #[case("24hr", 0)]
    #[case("1440m", 0)]
    #[case("86401s", 1)]
    fn test_literal_wraps_at_one_day(#[case] expression: &str, #[case] expected: u64) {
        assert_eq!(parse_time(expression, 0.0).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1m30")]
    #[case("30s1m")]
    #[case("1h")]
    #[case(" 1m")]
    #[case("End")]
    fn test_parse_rejects_malformed(#[case] expression: &str) {
        let err = parse_time(expression, 100.0).unwrap_err();
        assert!(matches!(err, CutError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let err = parse_time("99999999999999999999hr", 100.0).unwrap_err();
        assert!(matches!(err, CutError::Overflow { .. }), "{err:?}");
    }

    #[test]
    fn test_duration_seconds_clamps_invalid() {
        assert_eq!(duration_seconds(-3.0), 0);
        assert_eq!(duration_seconds(f64::NAN), 0);
        assert_eq!(duration_seconds(59.99), 59);
    }
}
