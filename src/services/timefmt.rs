use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed time \"{0}\": expected HH:MM in 24-hour format")]
pub struct MalformedTime(pub String);

/// Normalizes a time string into canonical zero-padded 24-hour "HH:MM".
///
/// Accepts loose input like "9:5" and returns "09:05". Rejects strings
/// without a ':' separator, non-numeric tokens, and out-of-range values
/// ("25:00", "10:61"). Canonical output compares correctly as a plain
/// string, which is what the conflict queries rely on.
pub fn normalize_time(raw: &str) -> Result<String, MalformedTime> {
    let malformed = || MalformedTime(raw.to_string());

    let (hours, minutes) = raw.trim().split_once(':').ok_or_else(malformed)?;
    let hours: u32 = hours.trim().parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| malformed())?;

    if hours > 23 || minutes > 59 {
        return Err(malformed());
    }

    Ok(format!("{hours:02}:{minutes:02}"))
}
