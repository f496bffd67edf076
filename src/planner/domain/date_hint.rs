//! Explicit date hints in planning requests.

use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

#[expect(
    clippy::expect_used,
    reason = "patterns are literals covered by the date hint tests"
)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("date hint pattern must compile")
}

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?:^|[^\d])(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})(?:[^\d]|$)")
});
static SPELLED_DATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(\d{1,2})\s+de\s+(\p{L}+)\.?\s+de\s+(\d{4}|\d{2})\b"));

/// Parses a free-text date hint.
///
/// Recognises numeric dates (`12/01/2026`, `12-1-26`, `12.01.2026`) and the
/// spelled form `10 de dez. de 2022`. Numeric dates are read day-first
/// unless only the month-first reading is valid. Two-digit years are in
/// the 2000s. Returns `None` for anything else, including impossible
/// calendar dates.
#[must_use]
pub fn parse_date_hint(hint: &str) -> Option<NaiveDate> {
    NUMERIC_DATE
        .captures(hint)
        .and_then(|captures| numeric_date(&captures))
        .or_else(|| {
            SPELLED_DATE
                .captures(hint)
                .and_then(|captures| spelled_date(&captures))
        })
}

fn numeric_date(captures: &Captures<'_>) -> Option<NaiveDate> {
    let first = number(captures, 1)?;
    let second = number(captures, 2)?;
    let year = parse_year(captures, 3)?;
    let (day, month) = if first <= 12 && second > 12 {
        (second, first)
    } else {
        (first, second)
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn spelled_date(captures: &Captures<'_>) -> Option<NaiveDate> {
    let day = number(captures, 1)?;
    let name = captures.get(2)?.as_str().to_lowercase();
    let prefix: String = name.chars().take(3).collect();
    let index = MONTH_ABBREVIATIONS
        .iter()
        .position(|abbreviation| *abbreviation == prefix)?;
    let month = u32::try_from(index).ok()?.checked_add(1)?;
    NaiveDate::from_ymd_opt(parse_year(captures, 3)?, month, day)
}

fn number(captures: &Captures<'_>, group: usize) -> Option<u32> {
    captures.get(group)?.as_str().parse().ok()
}

fn parse_year(captures: &Captures<'_>, group: usize) -> Option<i32> {
    let digits = captures.get(group)?.as_str();
    let value: i32 = digits.parse().ok()?;
    if digits.len() == 2 {
        value.checked_add(2000)
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::parse_date_hint;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    #[rstest]
    #[case("dia 12/01/2026", date(2026, 1, 12))]
    #[case("10 de dez. de 2022", date(2022, 12, 10))]
    #[case("no meaningful content", None)]
    #[case("05-03-26", date(2026, 3, 5))]
    #[case("31.12.2025", date(2025, 12, 31))]
    #[case("12/25/2025", date(2025, 12, 25))]
    #[case("25/12/2025", date(2025, 12, 25))]
    #[case("1 de Março de 2026", date(2026, 3, 1))]
    #[case("3 de setembro de 2027", date(2027, 9, 3))]
    #[case("31/02/2026", None)]
    #[case("32/13/2026", None)]
    #[case("5 de foo de 2026", None)]
    #[case("", None)]
    fn parses_date_hints(#[case] hint: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_date_hint(hint), expected);
    }

    #[rstest]
    fn renders_as_iso_date() {
        let parsed = parse_date_hint("dia 12/01/2026").map(|value| value.to_string());
        assert_eq!(parsed.as_deref(), Some("2026-01-12"));
    }
}
