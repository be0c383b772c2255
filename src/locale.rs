use chrono::{Locale, NaiveDate};

/// Maps a BCP-47-ish tag from the query string to a chrono locale. Unknown
/// tags fall back to `en_US`; slot identity never goes through this path.
pub fn locale_for_tag(tag: &str) -> Locale {
    let language = tag.split(['-', '_']).next().unwrap_or(tag);
    match language.to_ascii_lowercase().as_str() {
        "it" => Locale::it_IT,
        "de" => Locale::de_DE,
        "fr" => Locale::fr_FR,
        "es" => Locale::es_ES,
        _ => Locale::en_US,
    }
}

/// Display label for a day card: short weekday name plus day of month,
/// e.g. "Mon 10" or "lun 10".
pub fn day_label(date: NaiveDate, locale: Locale) -> String {
    date.format_localized("%a %-d", locale).to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test_case::test_case("it", Locale::it_IT)]
    #[test_case::test_case("it-IT", Locale::it_IT)]
    #[test_case::test_case("de_DE", Locale::de_DE)]
    #[test_case::test_case("en", Locale::en_US)]
    #[test_case::test_case("xx", Locale::en_US; "unknown tag falls back")]
    fn locale_for_tag_matches_language_prefix(tag: &str, expected: Locale) {
        assert_eq!(locale_for_tag(tag), expected);
    }

    #[test]
    fn day_label_uses_the_requested_locale_for_display_only() {
        let monday = date(2024, 6, 10);
        assert_eq!(day_label(monday, Locale::en_US), "Mon 10");
        assert_eq!(day_label(monday, Locale::it_IT), "lun 10");
    }
}
