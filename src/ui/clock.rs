use std::time::Duration;

use chrono::{DateTime, Local, Timelike};

pub const REFRESH: Duration = Duration::from_secs(15);

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub greeting: &'static str,
    pub clock: String,
    pub date: String,
}

impl Header {
    pub fn at(now: &DateTime<Local>) -> Self {
        Self {
            greeting: greeting(now.hour()),
            clock: now.format("%H:%M").to_string(),
            date: now.format("%a, %b %-d").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn greeting_follows_time_of_day() {
        assert_eq!(greeting(0), "Good morning");
        assert_eq!(greeting(11), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(17), "Good afternoon");
        assert_eq!(greeting(18), "Good evening");
    }

    #[test]
    fn header_labels() {
        let now = Local.with_ymd_and_hms(2024, 3, 8, 7, 5, 0).unwrap();
        let header = Header::at(&now);
        assert_eq!(header.clock, "07:05");
        assert_eq!(header.date, "Fri, Mar 8");
        assert_eq!(header.greeting, "Good morning");
    }
}
