use chrono::NaiveDate;

/// Map a WMO weather code onto a display glyph.
///
/// The code space is partitioned into ten condition classes; codes outside
/// every class render as a sentinel rather than failing, since providers
/// occasionally emit codes we do not know about.
pub fn weather_icon(code: i64) -> &'static str {
    match code {
        0 => "\u{2600}\u{fe0f}",                             // clear
        1 => "\u{1f324}",                                    // mostly clear
        2 => "\u{26c5}\u{fe0f}",                             // partly cloudy
        3 => "\u{2601}\u{fe0f}",                             // overcast
        45 | 48 => "\u{1f32b}",                              // fog
        51 | 56 | 61 | 66 | 80 => "\u{1f326}",               // light rain
        53 | 55 | 57 | 63 | 65 | 67 | 81 | 82 => "\u{1f327}", // moderate rain
        71 | 73 | 75 | 77 | 85 | 86 => "\u{1f328}",          // snow
        95 => "\u{1f329}",                                   // thunderstorm
        96 | 99 => "\u{26c8}",                               // heavy thunderstorm
        _ => "NOT FOUND",
    }
}

/// Build a flag glyph from an ISO 3166 two-letter country code by shifting
/// each letter into the Unicode regional-indicator block. The geocoder
/// guarantees two ASCII letters, so anything else is passed through as-is.
pub fn country_flag(country_code: &str) -> String {
    country_code
        .to_uppercase()
        .chars()
        .map(|c| char::from_u32(127397 + c as u32).unwrap_or(c))
        .collect()
}

/// Short English weekday label for a date, e.g. "Mon".
pub fn short_weekday(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

#[test]
fn test_weather_icon_partition() {
    assert_eq!(weather_icon(0), "\u{2600}\u{fe0f}");
    assert_eq!(weather_icon(1), "\u{1f324}");
    assert_eq!(weather_icon(2), "\u{26c5}\u{fe0f}");
    assert_eq!(weather_icon(3), "\u{2601}\u{fe0f}");
    for code in [45, 48] {
        assert_eq!(weather_icon(code), "\u{1f32b}");
    }
    for code in [51, 56, 61, 66, 80] {
        assert_eq!(weather_icon(code), "\u{1f326}");
    }
    for code in [53, 55, 57, 63, 65, 67, 81, 82] {
        assert_eq!(weather_icon(code), "\u{1f327}");
    }
    for code in [71, 73, 75, 77, 85, 86] {
        assert_eq!(weather_icon(code), "\u{1f328}");
    }
    assert_eq!(weather_icon(95), "\u{1f329}");
    for code in [96, 99] {
        assert_eq!(weather_icon(code), "\u{26c8}");
    }
}

#[test]
fn test_weather_icon_unknown_code() {
    assert_eq!(weather_icon(100), "NOT FOUND");
    assert_eq!(weather_icon(-1), "NOT FOUND");
    assert_eq!(weather_icon(4), "NOT FOUND");
}

#[test]
fn test_country_flag() {
    assert_eq!(country_flag("US"), "\u{1f1fa}\u{1f1f8}");
    assert_eq!(country_flag("FR"), "\u{1f1eb}\u{1f1f7}");
    assert_eq!(country_flag("DE"), "\u{1f1e9}\u{1f1ea}");
}

#[test]
fn test_country_flag_case_insensitive() {
    assert_eq!(country_flag("us"), country_flag("US"));
    assert_eq!(country_flag("fR"), country_flag("FR"));
}

#[test]
fn test_short_weekday() {
    let date = NaiveDate::from_ymd_opt(2027, 7, 10).unwrap();
    assert_eq!(short_weekday(date), "Sat");
    let date = NaiveDate::from_ymd_opt(2022, 7, 25).unwrap();
    assert_eq!(short_weekday(date), "Mon");
}
