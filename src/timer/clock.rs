//! Clock face formatting

/// Format a second count as an mm:ss clock face
///
/// Minutes are not wrapped into hours, so an hour-long countdown reads
/// "60:00".
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_clock(0), "00:00");
    }

    #[test]
    fn pads_single_digits() {
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(61), "01:01");
    }

    #[test]
    fn formats_whole_minutes() {
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(1500), "25:00");
    }

    #[test]
    fn keeps_minutes_past_an_hour() {
        assert_eq!(format_clock(3600), "60:00");
        assert_eq!(format_clock(5405), "90:05");
    }
}
