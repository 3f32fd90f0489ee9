//! Upload filename validation.
//!
//! Snapshot uploads are named `host_<ipv4>_<YYYY-MM-DDTHH-MM-SSZ>.json`. The
//! host address and capture time are taken from the name, validated, and the
//! time portion is normalized to ISO-8601 (`HH-MM-SS` -> `HH:MM:SS`).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^host_([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})_([0-9]{4})-([0-9]{2})-([0-9]{2})T([0-9]{2})-([0-9]{2})-([0-9]{2})Z\.json$",
    )
    .expect("filename pattern is a valid regex")
});

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Filename does not match expected format 'host_<ip>_<YYYY-MM-DDTHH-MM-SSZ>.json': {filename}")]
    Format { filename: String },

    #[error("Invalid IP address octet [{index}]: {value} (must be 0-255)")]
    Octet { index: usize, value: u32 },

    #[error("Invalid month: {0} (must be 1-12)")]
    Month(u32),

    #[error("Invalid day: {0} (must be 1-31)")]
    Day(u32),

    #[error("Invalid hour: {0} (must be 0-23)")]
    Hour(u32),

    #[error("Invalid minute: {0} (must be 0-59)")]
    Minute(u32),

    #[error("Invalid second: {0} (must be 0-59)")]
    Second(u32),

    #[error("Invalid date: {year:04}-{month:02}-{day:02} does not exist")]
    Date { year: i32, month: u32, day: u32 },
}

/// Host address and capture time extracted from an upload filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub address: String,
    /// ISO-8601, e.g. "2025-10-16T12:00:00Z".
    pub timestamp: String,
}

/// Parse and validate an upload filename such as
/// `host_127.0.0.1_2025-10-16T12-00-00Z.json`.
pub fn parse_filename(filename: &str) -> Result<ParsedFilename, ValidationError> {
    let caps = FILENAME_PATTERN
        .captures(filename)
        .ok_or_else(|| ValidationError::Format {
            filename: filename.to_string(),
        })?;

    // Every group is an ASCII digit run of at most four characters.
    let num = |i: usize| -> u32 { caps[i].parse().unwrap_or(u32::MAX) };

    for index in 0..4 {
        let value = num(index + 1);
        if value > 255 {
            return Err(ValidationError::Octet { index, value });
        }
    }

    let (year, month, day) = (num(5), num(6), num(7));
    let (hour, minute, second) = (num(8), num(9), num(10));

    if !(1..=12).contains(&month) {
        return Err(ValidationError::Month(month));
    }
    if !(1..=31).contains(&day) {
        return Err(ValidationError::Day(day));
    }
    if hour > 23 {
        return Err(ValidationError::Hour(hour));
    }
    if minute > 59 {
        return Err(ValidationError::Minute(minute));
    }
    if second > 59 {
        return Err(ValidationError::Second(second));
    }

    let year = year as i32;
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return Err(ValidationError::Date { year, month, day });
    }

    Ok(ParsedFilename {
        address: format!("{}.{}.{}.{}", &caps[1], &caps[2], &caps[3], &caps[4]),
        timestamp: format!(
            "{}-{}-{}T{}:{}:{}Z",
            &caps[5], &caps[6], &caps[7], &caps[8], &caps[9], &caps[10]
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_filenames() {
        let cases = [
            ("host_127.0.0.1_2025-10-16T12-00-00Z.json", "127.0.0.1", "2025-10-16T12:00:00Z"),
            ("host_192.168.1.100_2025-09-10T03-00-00Z.json", "192.168.1.100", "2025-09-10T03:00:00Z"),
            ("host_0.0.0.0_2025-10-16T12-00-00Z.json", "0.0.0.0", "2025-10-16T12:00:00Z"),
            ("host_255.255.255.255_2024-02-29T23-59-59Z.json", "255.255.255.255", "2024-02-29T23:59:59Z"),
        ];

        for (filename, address, timestamp) in cases {
            let parsed = parse_filename(filename).unwrap();
            assert_eq!(parsed.address, address, "{filename}");
            assert_eq!(parsed.timestamp, timestamp, "{filename}");
        }
    }

    #[test]
    fn test_format_mismatches() {
        let cases = [
            "",
            "snapshot_127.0.0.1_2025-10-16T12-00-00Z.json",
            "host_127.0.0.1_2025-10-16T12-00-00Z",
            "host_-1.0.0.1_2025-10-16T12-00-00Z.json",
            "host_127.0.0_2025-10-16T12-00-00Z.json",
            "host_127.0.0.1_2025-10-16T12:00:00Z.json",
            "host_127.0.0.1'; DROP TABLE snapshots;--_2025-01-01T00-00-00Z.json",
            "host_127.0.0.1<script>alert('xss')</script>_2025-01-01T00-00-00Z.json",
            "host_../../etc/passwd_2025-01-01T00-00-00Z.json",
            "../host_127.0.0.1_2025-10-16T12-00-00Z.json",
            "host_127.0.0.1_2025-10-16T12-00-00Z.json.bak",
        ];

        for filename in cases {
            assert!(
                matches!(parse_filename(filename), Err(ValidationError::Format { .. })),
                "{filename}"
            );
        }
    }

    #[test]
    fn test_octet_out_of_range() {
        assert_eq!(
            parse_filename("host_256.0.0.1_2025-10-16T12-00-00Z.json"),
            Err(ValidationError::Octet { index: 0, value: 256 })
        );
        assert_eq!(
            parse_filename("host_10.0.0.999_2025-10-16T12-00-00Z.json"),
            Err(ValidationError::Octet { index: 3, value: 999 })
        );
    }

    #[test]
    fn test_timestamp_components_out_of_range() {
        let cases = [
            ("host_127.0.0.1_2025-13-16T12-00-00Z.json", ValidationError::Month(13)),
            ("host_127.0.0.1_2025-00-16T12-00-00Z.json", ValidationError::Month(0)),
            ("host_127.0.0.1_2025-10-32T12-00-00Z.json", ValidationError::Day(32)),
            ("host_127.0.0.1_2025-10-00T12-00-00Z.json", ValidationError::Day(0)),
            ("host_127.0.0.1_2025-10-16T24-00-00Z.json", ValidationError::Hour(24)),
            ("host_127.0.0.1_2025-10-16T12-60-00Z.json", ValidationError::Minute(60)),
            ("host_127.0.0.1_2025-10-16T12-00-60Z.json", ValidationError::Second(60)),
        ];

        for (filename, expected) in cases {
            assert_eq!(parse_filename(filename), Err(expected), "{filename}");
        }
    }

    #[test]
    fn test_nonexistent_calendar_dates() {
        assert_eq!(
            parse_filename("host_127.0.0.1_2025-02-30T12-00-00Z.json"),
            Err(ValidationError::Date { year: 2025, month: 2, day: 30 })
        );
        assert_eq!(
            parse_filename("host_127.0.0.1_2025-02-29T12-00-00Z.json"),
            Err(ValidationError::Date { year: 2025, month: 2, day: 29 })
        );
        assert!(parse_filename("host_127.0.0.1_2025-04-31T12-00-00Z.json").is_err());
    }

    #[test]
    fn test_error_messages_name_the_component() {
        let err = parse_filename("host_127.0.0.1_2025-13-16T12-00-00Z.json").unwrap_err();
        assert_eq!(err.to_string(), "Invalid month: 13 (must be 1-12)");
    }
}
