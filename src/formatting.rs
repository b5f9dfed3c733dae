use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Tue 05, 21, 2019 9:30PM`
    Medium,
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
}

pub fn format_datetime(value: &DateTime<Utc>, style: DateStyle) -> String {
    let pattern = match style {
        DateStyle::Medium => "%a %m, %d, %Y %-I:%M%p",
        DateStyle::Full => "%A %B, %-d, %Y at %-I:%M%p",
    };
    value.format(pattern).to_string()
}

/// Timestamp column of the shows listing
pub fn format_listing_time(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `1231231234` becomes `123-123-1234`; anything that isn't ten digits is shown as stored.
pub fn format_phone(digits: &str) -> String {
    if digits.len() == 10 && digits.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        digits.to_string()
    }
}
