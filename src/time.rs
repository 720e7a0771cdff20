use chrono::Local;

const SECOND: u64 = 1;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

pub fn current_timestamp() -> u64 {
    Local::now().timestamp() as u64
}

/// Local calendar date, `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

pub fn format_since(time: u64) -> String {
    if time == 0 {
        return String::from("never");
    }
    let duration = current_timestamp().saturating_sub(time);

    let (value, unit) = if duration < MINUTE {
        return String::from("now");
    } else if duration < HOUR {
        (duration / MINUTE, "minute")
    } else if duration < DAY {
        (duration / HOUR, "hour")
    } else {
        (duration / DAY, "day")
    };

    if value > 1 {
        format!("{value} {unit}s ago")
    } else {
        format!("1 {unit} ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_since() {
        let now = current_timestamp();
        assert_eq!(format_since(0), "never");
        assert_eq!(format_since(now), "now");
        assert_eq!(format_since(now - 2 * MINUTE - 5), "2 minutes ago");
        assert_eq!(format_since(now - HOUR - 10), "1 hour ago");
        assert_eq!(format_since(now - 3 * DAY), "3 days ago");
    }

    #[test]
    fn test_today() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }
}
