use chrono::Duration;

/// Parses an ISO 8601 duration of the restricted `PT#H#M#S` shape used
/// throughout TransXChange (`RunTime`, `WaitTime`, journey pattern timing
/// links). Any of the three components may be absent; a bare `PT0S` and an
/// empty `PT` both parse to a zero duration.
pub fn parse_iso8601(text: &str) -> Result<Duration, DurationMalformed> {
    let text = text.trim();
    let rest = text
        .strip_prefix("PT")
        .ok_or_else(|| DurationMalformed(text.to_string()))?;

    let mut hours = 0i64;
    let mut minutes = 0i64;
    let mut seconds = 0i64;
    let mut digits = String::new();

    for ch in rest.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            'H' => {
                hours = take_digits(&mut digits, text)?;
            }
            'M' => {
                minutes = take_digits(&mut digits, text)?;
            }
            'S' => {
                seconds = take_digits(&mut digits, text)?;
            }
            _ => return Err(DurationMalformed(text.to_string())),
        }
    }
    if !digits.is_empty() {
        return Err(DurationMalformed(text.to_string()));
    }

    Ok(Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds))
}

fn take_digits(digits: &mut String, whole: &str) -> Result<i64, DurationMalformed> {
    let value = digits
        .parse()
        .map_err(|_| DurationMalformed(whole.to_string()))?;
    digits.clear();
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationMalformed(pub String);

impl std::fmt::Display for DurationMalformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed ISO 8601 duration: {:?}", self.0)
    }
}

impl std::error::Error for DurationMalformed {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_minutes_seconds() {
        assert_eq!(
            parse_iso8601("PT1H2M3S").unwrap(),
            Duration::hours(1) + Duration::minutes(2) + Duration::seconds(3)
        );
    }

    #[test]
    fn parses_minutes_only() {
        assert_eq!(parse_iso8601("PT15M").unwrap(), Duration::minutes(15));
    }

    #[test]
    fn parses_zero_duration() {
        assert_eq!(parse_iso8601("PT0S").unwrap(), Duration::zero());
    }

    #[test]
    fn rejects_non_iso_text() {
        assert!(parse_iso8601("15 minutes").is_err());
    }
}
