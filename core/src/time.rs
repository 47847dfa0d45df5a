use chrono::{Duration, Local, NaiveDate};
use anyhow::{anyhow, Result};

/// Parses a fill-up date relative to the local current day.
pub fn parse_human_date(input: &str) -> Result<NaiveDate> {
    parse_date_from(input, Local::now().date_naive())
}

/// Same as [`parse_human_date`] with an explicit anchor day.
pub fn parse_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    // 2. Relative format (-Nd, -Nw)
    if let Some(rest) = input.strip_prefix('-') {
        let unit = rest.chars().last().ok_or_else(|| anyhow!("Invalid relative format: {}", input))?;
        let num_str = &rest[..rest.len() - unit.len_utf8()];
        let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: {}", input))?;
        if count < 0 {
            return Err(anyhow!("Invalid relative format: {}", input));
        }

        let offset = match unit {
            'd' => Duration::try_days(count),
            'w' => Duration::try_weeks(count),
            _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
        };
        return offset
            .and_then(|d| today.checked_sub_signed(d))
            .ok_or_else(|| anyhow!("Invalid relative format: {}", input));
    }

    // 3. Absolute formats
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(input, format) {
            return Ok(d);
        }
    }

    Err(anyhow!("Could not parse date: {}", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_date_from("today", anchor()).unwrap(), anchor());
        assert_eq!(
            parse_date_from("Yesterday", anchor()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
    }

    #[test]
    fn test_relative() {
        assert_eq!(
            parse_date_from("-3d", anchor()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
        );
        assert_eq!(
            parse_date_from("-2w", anchor()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 24).unwrap()
        );
        assert!(parse_date_from("-3x", anchor()).is_err());
        assert!(parse_date_from("-d", anchor()).is_err());
        assert!(parse_date_from("-3é", anchor()).is_err());
    }

    #[test]
    fn test_relative_out_of_range_is_an_error() {
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(parse_date_from("-99999999d", anchor).is_err());
        assert!(parse_date_from("-99999999999999w", anchor).is_err());
    }

    #[test]
    fn test_relative_rejects_negative_count() {
        assert!(parse_date_from("--5d", anchor()).is_err());
        assert!(parse_date_from("--1w", anchor()).is_err());
    }

    #[test]
    fn test_absolute_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 28).unwrap();
        assert_eq!(parse_date_from("2025-01-28", anchor()).unwrap(), expected);
        assert_eq!(parse_date_from("28/01/2025", anchor()).unwrap(), expected);
        assert_eq!(parse_date_from("28.01.2025", anchor()).unwrap(), expected);
        assert!(parse_date_from("2025-13-01", anchor()).is_err());
        assert!(parse_date_from("", anchor()).is_err());
    }
}
