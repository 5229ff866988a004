//! Human-readable route summaries.

/// Format a duration as `"Xh Ym"`, or `"Ym"` under an hour.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0);
    let hours = (total / 3600.0).floor() as u64;
    let minutes = ((total % 3600.0) / 60.0).floor() as u64;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a distance in meters as kilometres with one decimal (`"3.4 km"`).
pub fn format_distance_km(meters: f64) -> String {
    format!("{:.1} km", meters.max(0.0) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0m");
        assert_eq!(format_duration(59.0), "0m");
        assert_eq!(format_duration(720.5), "12m");
        assert_eq!(format_duration(3600.0), "1h 0m");
        assert_eq!(format_duration(5430.0), "1h 30m");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance_km(3400.0), "3.4 km");
        assert_eq!(format_distance_km(3449.0), "3.4 km");
        assert_eq!(format_distance_km(870.0), "0.9 km");
        assert_eq!(format_distance_km(0.0), "0.0 km");
    }
}
