use web_sys::window;

pub fn format_iso8601_date(iso_date: &str) -> String {
    if let Ok(datetime) = iso_date.parse::<chrono::DateTime<chrono::Utc>>() {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        iso_date.to_string()
    }
}

// Formats each x1000 step
pub fn format_number(number: i64) -> String {
    let num_str = number.unsigned_abs().to_string();
    let mut result = String::new();
    if number < 0 {
        result.push('-');
    }
    let len = num_str.len();

    for (i, c) in num_str.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Blocking browser confirmation dialog. Anything but an explicit "OK" is a no.
pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{format_iso8601_date, format_number};

    #[test]
    fn iso_dates_render_as_calendar_days() {
        assert_eq!(format_iso8601_date("2024-03-09T17:45:00.000Z"), "2024-03-09");
    }

    #[test]
    fn unparseable_dates_pass_through() {
        assert_eq!(format_iso8601_date("yesterday"), "yesterday");
        assert_eq!(format_iso8601_date(""), "");
    }

    #[test]
    fn numbers_get_thousand_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(-4_200), "-4,200");
    }
}
