//! Display formatting for capture results
//!
//! Turns the raw asset timestamp and the latest fix into the strings shown
//! under the photo.

use chrono::{DateTime, Locale, NaiveDateTime};

use crate::location::Coordinates;

/// Day name, day of month, month name, year, then 24h time.
pub const CAPTURE_TIME_PATTERN: &str = "%A, %-d %B %Y, %H:%M";

const NAIVE_PATTERNS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y:%m:%d %H:%M:%S"];

/// Fixed locale and zone label used for every rendered time
#[derive(Debug, Clone)]
pub struct TimeFormat {
    pub locale: Locale,
    pub zone_label: String,
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self {
            locale: Locale::id_ID,
            zone_label: "WITA".to_string(),
        }
    }
}

/// Format an ISO-8601 timestamp for display.
///
/// The wall-clock time carried by the timestamp's own offset is kept, so a
/// camera that stamps local time renders that local time. Missing or
/// malformed input yields `None`.
pub fn format_capture_time(timestamp: Option<&str>, format: &TimeFormat) -> Option<String> {
    let raw = timestamp?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(
            dt.format_localized(CAPTURE_TIME_PATTERN, format.locale)
                .to_string(),
        );
    }

    // Timestamps without an offset are taken as wall-clock time
    NAIVE_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map(|naive| {
            naive
                .and_utc()
                .format_localized(CAPTURE_TIME_PATTERN, format.locale)
                .to_string()
        })
}

/// The capture time line as shown on screen, suffixed with the zone label
pub fn display_capture_time(image_time: Option<&str>, format: &TimeFormat) -> String {
    match image_time {
        Some(time) if !time.is_empty() => format!("{} {}", time, format.zone_label),
        _ => "-".to_string(),
    }
}

pub fn format_coordinates(position: Option<Coordinates>) -> String {
    match position {
        Some(coords) => format!("Lat: {}, Long: {}", coords.latitude, coords.longitude),
        None => "Lat: -, Long: -".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> TimeFormat {
        TimeFormat {
            locale: Locale::en_GB,
            zone_label: "UTC".to_string(),
        }
    }

    #[test]
    fn test_format_capture_time_indonesian() {
        let formatted = format_capture_time(Some("2023-06-15T09:05:00Z"), &TimeFormat::default());
        assert_eq!(formatted.as_deref(), Some("Kamis, 15 Juni 2023, 09:05"));
    }

    #[test]
    fn test_format_capture_time_english() {
        let formatted = format_capture_time(Some("2023-06-15T09:05:00Z"), &english());
        assert_eq!(formatted.as_deref(), Some("Thursday, 15 June 2023, 09:05"));
    }

    #[test]
    fn test_format_keeps_timestamp_offset() {
        let formatted = format_capture_time(Some("2024-01-02T23:30:00+08:00"), &english());
        assert_eq!(formatted.as_deref(), Some("Tuesday, 2 January 2024, 23:30"));
    }

    #[test]
    fn test_format_naive_timestamp() {
        let formatted = format_capture_time(Some("2023-06-15T09:05:00.123"), &english());
        assert_eq!(formatted.as_deref(), Some("Thursday, 15 June 2023, 09:05"));

        let exif = format_capture_time(Some("2023:06:15 21:40:07"), &english());
        assert_eq!(exif.as_deref(), Some("Thursday, 15 June 2023, 21:40"));
    }

    #[test]
    fn test_format_fails_soft() {
        let format = TimeFormat::default();
        assert_eq!(format_capture_time(None, &format), None);
        assert_eq!(format_capture_time(Some(""), &format), None);
        assert_eq!(format_capture_time(Some("not a date"), &format), None);
        assert_eq!(format_capture_time(Some("2023-13-45T99:00:00Z"), &format), None);
    }

    #[test]
    fn test_display_capture_time() {
        let format = TimeFormat::default();
        assert_eq!(
            display_capture_time(Some("Kamis, 15 Juni 2023, 09:05"), &format),
            "Kamis, 15 Juni 2023, 09:05 WITA"
        );
        assert_eq!(display_capture_time(None, &format), "-");
        assert_eq!(display_capture_time(Some(""), &format), "-");
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(None), "Lat: -, Long: -");
        assert_eq!(
            format_coordinates(Some(Coordinates::new(-3.316694, 114.590111))),
            "Lat: -3.316694, Long: 114.590111"
        );
        // A fix on the equator and prime meridian is a real reading
        assert_eq!(
            format_coordinates(Some(Coordinates::new(0.0, 0.0))),
            "Lat: 0, Long: 0"
        );
    }
}
