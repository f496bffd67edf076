//! Due-date distribution for generated batches.

use super::parse_date_hint;
use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

const DEFAULT_PERIOD_DAYS: u64 = 7;

#[expect(
    clippy::expect_used,
    reason = "pattern is a literal covered by the distribution tests"
)]
static PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(semanas?|weeks?|dias?|days?|meses|mês|mes|months?)\b")
        .expect("period pattern must compile")
});

/// Spreads `count` due dates evenly over the period named by `hint`.
///
/// Periods are `N semanas|weeks` (7 days each), `N dias|days` and
/// `N meses|months` (30 days each). The count may touch the unit
/// (`2semanas`); a hint without an explicit count means one week. Dates
/// start tomorrow and are `max(1, period / count)` days apart. A missing
/// or blank hint yields `None` for every item.
#[must_use]
pub fn distribute_due_dates(
    count: usize,
    hint: Option<&str>,
    today: NaiveDate,
) -> Vec<Option<NaiveDate>> {
    let Some(text) = hint.map(str::trim).filter(|text| !text.is_empty()) else {
        return vec![None; count];
    };
    let total_days = period_days(text);
    let interval = u64::try_from(count)
        .ok()
        .and_then(|items| total_days.checked_div(items))
        .unwrap_or(0)
        .max(1);

    (0..count)
        .map(|index| {
            let offset = u64::try_from(index)
                .ok()?
                .checked_mul(interval)?
                .checked_add(1)?;
            today.checked_add_days(Days::new(offset))
        })
        .collect()
}

/// Picks due dates for a batch.
///
/// A parseable explicit date applies to every item; otherwise the
/// scheduling hint is distributed; otherwise no item gets a date.
#[must_use]
pub fn resolve_due_dates(
    count: usize,
    date_hint: Option<&str>,
    scheduling_hint: Option<&str>,
    today: NaiveDate,
) -> Vec<Option<NaiveDate>> {
    date_hint.and_then(parse_date_hint).map_or_else(
        || distribute_due_dates(count, scheduling_hint, today),
        |date| vec![Some(date); count],
    )
}

fn period_days(text: &str) -> u64 {
    let Some(captures) = PERIOD.captures(text) else {
        return DEFAULT_PERIOD_DAYS;
    };
    let Some(amount) = captures
        .get(1)
        .and_then(|digits| digits.as_str().parse::<u64>().ok())
    else {
        return DEFAULT_PERIOD_DAYS;
    };
    let unit = captures
        .get(2)
        .map(|unit| unit.as_str().to_lowercase())
        .unwrap_or_default();
    let unit_days = if unit.starts_with("semana") || unit.starts_with("week") {
        7
    } else if unit.starts_with("dia") || unit.starts_with("day") {
        1
    } else {
        30
    };
    amount.saturating_mul(unit_days)
}

#[cfg(test)]
mod tests {
    use super::{distribute_due_dates, resolve_due_dates};
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    #[fixture]
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date")
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 1, d)
    }

    #[rstest]
    fn spreads_two_weeks_over_four_items(today: NaiveDate) {
        let dates = distribute_due_dates(4, Some("2 semanas"), today);
        assert_eq!(dates, vec![day(6), day(9), day(12), day(15)]);
    }

    #[rstest]
    #[case("3 dias", vec![day(6), day(7), day(8)])]
    #[case("próximo mês", vec![day(6), day(8), day(10)])]
    #[case("2semanas", vec![day(6), day(10), day(14)])]
    #[case("1 mês", vec![day(6), day(16), day(26)])]
    #[case("nas próximas semanas", vec![day(6), day(8), day(10)])]
    #[case("em breve", vec![day(6), day(8), day(10)])]
    #[case("1 week", vec![day(6), day(8), day(10)])]
    fn recognises_periods(
        today: NaiveDate,
        #[case] hint: &str,
        #[case] expected: Vec<Option<NaiveDate>>,
    ) {
        assert_eq!(distribute_due_dates(3, Some(hint), today), expected);
    }

    #[rstest]
    fn interval_never_drops_below_one_day(today: NaiveDate) {
        let dates = distribute_due_dates(5, Some("2 dias"), today);
        assert_eq!(dates, vec![day(6), day(7), day(8), day(9), day(10)]);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn no_hint_yields_no_dates(today: NaiveDate, #[case] hint: Option<&str>) {
        assert_eq!(distribute_due_dates(2, hint, today), vec![None, None]);
    }

    #[rstest]
    fn explicit_date_wins_over_period(today: NaiveDate) {
        let dates = resolve_due_dates(2, Some("dia 20/01/2026"), Some("2 semanas"), today);
        assert_eq!(dates, vec![day(20), day(20)]);
    }

    #[rstest]
    fn unparseable_date_falls_back_to_period(today: NaiveDate) {
        let dates = resolve_due_dates(2, Some("sometime"), Some("4 dias"), today);
        assert_eq!(dates, vec![day(6), day(8)]);
    }

    #[rstest]
    fn zero_items_yield_no_dates(today: NaiveDate) {
        assert!(distribute_due_dates(0, Some("2 semanas"), today).is_empty());
    }
}
