//! Locale-aware currency and date formatting.
//!
//! All functions are total: malformed input yields a fallback value or the
//! [`SENTINEL`] instead of an error.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};

/// Displayed for unset or unreadable timestamps.
pub const SENTINEL: &str = "-";

/// Display conventions for one locale.
#[derive(Clone, Debug, PartialEq)]
pub struct Locale {
    pub currency_prefix: String,
    pub thousands_separator: char,
    pub short_months: [&'static str; 12],
    pub utc_offset: FixedOffset,
}

const ID_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

impl Locale {
    /// Indonesian conventions (`Rp 150.000`, `05 Mei 2024`) at the given
    /// UTC offset. An out-of-range offset falls back to UTC.
    pub fn id_id(utc_offset_minutes: i32) -> Self {
        let utc_offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix());
        Locale {
            currency_prefix: "Rp".to_string(),
            thousands_separator: '.',
            short_months: ID_MONTHS,
            utc_offset,
        }
    }
}

impl Default for Locale {
    /// `id-ID` at UTC+7.
    fn default() -> Self {
        Locale::id_id(420)
    }
}

/// Leading integer of a price string: optional sign, then digits. Anything
/// after the digits is ignored; no digits at all gives 0.
pub fn parse_price(price: &str) -> i64 {
    let s = price.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}

/// `1234567` → `1.234.567` with the given separator.
pub fn group_thousands(value: i64, separator: char) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// `"150000"` → `"Rp 150.000"`.
pub fn format_currency(price: &str, locale: &Locale) -> String {
    format!(
        "{} {}",
        locale.currency_prefix,
        group_thousands(parse_price(price), locale.thousands_separator)
    )
}

/// Epoch milliseconds from a timestamp string. `""`, `"0"`, non-numeric and
/// non-positive values are unset.
pub fn parse_timestamp(ts: &str) -> Option<i64> {
    ts.trim().parse::<i64>().ok().filter(|ms| *ms > 0)
}

fn local_datetime(ts: &str, locale: &Locale) -> Option<DateTime<FixedOffset>> {
    let millis = parse_timestamp(ts)?;
    let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
    Some(utc.with_timezone(&locale.utc_offset))
}

/// Calendar date of a timestamp in the locale's offset.
pub fn calendar_date(ts: &str, locale: &Locale) -> Option<NaiveDate> {
    local_datetime(ts, locale).map(|dt| dt.date_naive())
}

fn date_label(date: NaiveDate, locale: &Locale) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        locale.short_months[date.month0() as usize],
        date.year()
    )
}

/// `dd Mon yyyy`, or `-` when unset.
pub fn format_date(ts: &str, locale: &Locale) -> String {
    match calendar_date(ts, locale) {
        Some(date) => date_label(date, locale),
        None => SENTINEL.to_string(),
    }
}

/// `dd Mon yyyy, HH.MM`, or `-` when unset.
pub fn format_date_time(ts: &str, locale: &Locale) -> String {
    match local_datetime(ts, locale) {
        Some(dt) => format!(
            "{}, {:02}.{:02}",
            date_label(dt.date_naive(), locale),
            dt.hour(),
            dt.minute()
        ),
        None => SENTINEL.to_string(),
    }
}

/// Like [`format_date`] but an empty string when unset.
pub fn format_optional_date(ts: &str, locale: &Locale) -> String {
    calendar_date(ts, locale)
        .map(|date| date_label(date, locale))
        .unwrap_or_default()
}

/// Epoch milliseconds of `date` at 00:00 UTC, as sent for date pickers.
pub fn utc_midnight_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        let locale = Locale::default();
        assert_eq!(format_currency("150000", &locale), "Rp 150.000");
        assert_eq!(format_currency("1234567", &locale), "Rp 1.234.567");
        assert_eq!(format_currency("999", &locale), "Rp 999");
        assert_eq!(format_currency("0", &locale), "Rp 0");
    }

    #[test]
    fn test_format_currency_lenient() {
        let locale = Locale::default();
        assert_eq!(format_currency("150000.75", &locale), "Rp 150.000");
        assert_eq!(format_currency("  2500abc", &locale), "Rp 2.500");
        assert_eq!(format_currency("abc", &locale), "Rp 0");
        assert_eq!(format_currency("", &locale), "Rp 0");
        assert_eq!(format_currency("-4500", &locale), "Rp -4.500");
    }

    #[test]
    fn test_format_date_sentinels() {
        let locale = Locale::default();
        assert_eq!(format_date("", &locale), "-");
        assert_eq!(format_date("0", &locale), "-");
        assert_eq!(format_date("yesterday", &locale), "-");
        assert_eq!(format_date("-5", &locale), "-");
        assert_eq!(format_date_time("", &locale), "-");
    }

    #[test]
    fn test_format_date_uses_offset() {
        // 2024-05-04T20:00:00Z is already 5 May at UTC+7.
        let ts = "1714852800000";
        assert_eq!(format_date(ts, &Locale::default()), "05 Mei 2024");
        assert_eq!(format_date(ts, &Locale::id_id(0)), "04 Mei 2024");
        assert_eq!(format_date_time(ts, &Locale::default()), "05 Mei 2024, 03.00");
    }

    #[test]
    fn test_month_names() {
        let locale = Locale::id_id(0);
        // 2023-08-17T00:00:00Z and 2023-12-25T00:00:00Z
        assert_eq!(format_date("1692230400000", &locale), "17 Agu 2023");
        assert_eq!(format_date("1703462400000", &locale), "25 Des 2023");
    }

    #[test]
    fn test_optional_date() {
        let locale = Locale::id_id(0);
        assert_eq!(format_optional_date("", &locale), "");
        assert_eq!(format_optional_date("1692230400000", &locale), "17 Agu 2023");
    }

    #[test]
    fn test_utc_midnight_millis() {
        let date = NaiveDate::from_ymd_opt(2023, 8, 17).expect("valid date");
        assert_eq!(utc_midnight_millis(date), 1_692_230_400_000);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, '.'), "0");
        assert_eq!(group_thousands(1000, '.'), "1.000");
        assert_eq!(group_thousands(100000, ','), "100,000");
        assert_eq!(group_thousands(-1000000, '.'), "-1.000.000");
    }
}
