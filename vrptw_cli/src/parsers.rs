use jiff::{SpanRelativeTo, civil::Time};

/// Accepts `PT1H30M`, `1h 30m`, `90s` or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(format!("invalid duration `{input}`"))
}

/// Wall clock time such as `09:00` or `17:30:00`.
pub fn parse_clock(input: &str) -> Result<Time, String> {
    input
        .parse::<Time>()
        .map_err(|err| format!("invalid time of day `{input}`: {err}"))
}
