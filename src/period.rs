use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;

use crate::models::Expense;

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Today,
    Week,
    Month,
    Year,
    All,
}

impl Period {
    /// Unrecognised names mean `All`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "today" => Self::Today,
            "week" => Self::Week,
            "month" => Self::Month,
            "year" => Self::Year,
            _ => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::Year => "This Year",
            Self::All => "All Time",
        }
    }
}

/// A calendar month picked explicitly while the period is `Month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Parse `YYYY-MM`. Anything that is not exactly four digits, a dash and
    /// two digits gives `None`. The month number itself is not range checked,
    /// so `2024-13` parses and simply matches no record.
    pub fn parse(raw: &str) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"^([0-9]{4})-([0-9]{2})$").expect("valid month pattern"));
        let caps = re.captures(raw)?;
        Some(Self {
            year: caps[1].parse().ok()?,
            month: caps[2].parse().ok()?,
        })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Whether a transaction day falls in `period`, judged against `today`.
pub fn in_period(day: NaiveDate, period: Period, custom_month: Option<YearMonth>, today: NaiveDate) -> bool {
    match period {
        Period::Today => day == today,
        Period::Week => day >= today - Duration::days(7),
        Period::Month => custom_month.unwrap_or_else(|| YearMonth::of(today)).contains(day),
        Period::Year => day.year() == today.year(),
        Period::All => true,
    }
}

/// Keep the records whose date falls in `period`.
///
/// `custom_month` only matters for `Period::Month` and is ignored unless it
/// is a well-formed `YYYY-MM`. Records with an unreadable date only survive
/// under `Period::All`.
pub fn filter_by_period<'a>(
    records: &'a [Expense],
    period: Period,
    custom_month: Option<&str>,
    today: NaiveDate,
) -> Vec<&'a Expense> {
    if period == Period::All {
        return records.iter().collect();
    }
    let custom = custom_month.and_then(YearMonth::parse);
    records
        .iter()
        .filter(|e| e.day().is_some_and(|day| in_period(day, period, custom, today)))
        .collect()
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Text used when matching an amount against a search term: `50` for 50.0,
/// `12.5` for 12.5.
///
/// Always plain decimal, never exponent notation: 1e21 is
/// `1000000000000000000000` and 1e-7 is `0.0000001`, so a search for `e`
/// never matches an amount.
pub fn amount_text(amount: f64) -> String {
    format!("{amount}")
}

/// Case-insensitive match of `term` against description, category tag or
/// amount text, AND an exact category match when `category` is non-empty.
/// An empty term matches everything.
pub fn search<'a>(records: &[&'a Expense], term: &str, category: Option<&str>) -> Vec<&'a Expense> {
    let term = term.to_lowercase();
    let category = category.filter(|c| !c.is_empty());
    records
        .iter()
        .copied()
        .filter(|e| {
            term.is_empty()
                || e.description.to_lowercase().contains(&term)
                || e.category.to_lowercase().contains(&term)
                || amount_text(e.amount).contains(&term)
        })
        .filter(|e| category.map_or(true, |c| e.category == c))
        .collect()
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// The active period selection. Starts at `Today` and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    period: Period,
    custom_month: Option<String>,
}

impl ViewState {
    pub fn period(&self) -> Period {
        self.period
    }

    pub fn custom_month(&self) -> Option<&str> {
        self.custom_month.as_deref()
    }

    /// Switch period. Entering `Month` adopts the month selector's value;
    /// any other period clears it.
    pub fn select_period(&mut self, period: Period, month_selector: Option<&str>) {
        self.period = period;
        self.custom_month = match period {
            Period::Month => month_selector.map(str::to_string),
            _ => None,
        };
    }

    /// Change the picked month. Ignored unless the period is `Month`.
    pub fn set_custom_month(&mut self, value: &str) {
        if self.period == Period::Month {
            self.custom_month = Some(value.to_string());
        }
    }

    pub fn filter<'a>(&self, records: &'a [Expense], today: NaiveDate) -> Vec<&'a Expense> {
        filter_by_period(records, self.period, self.custom_month(), today)
    }

    /// Heading for the active window, e.g. "This Month" or "2024-05".
    pub fn label(&self, today: NaiveDate) -> String {
        match (self.period, self.custom_month().and_then(YearMonth::parse)) {
            (Period::Month, Some(ym)) if ym != YearMonth::of(today) => {
                format!("{:04}-{:02}", ym.year, ym.month)
            }
            (period, _) => period.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn expense(id: i64, amount: f64, category: &str, date: &str, description: &str) -> Expense {
        Expense {
            id,
            amount,
            category: category.to_string(),
            date: date.to_string(),
            description: description.to_string(),
            created_at: None,
            extra: Map::new(),
        }
    }

    fn ids(records: &[&Expense]) -> Vec<i64> {
        records.iter().map(|e| e.id).collect()
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(1, 10.0, "food", "2024-06-15", "Lunch"),
            expense(2, 20.0, "food", "2024-06-14", ""),
            expense(3, 30.0, "rent", "2024-05-15", ""),
            expense(4, 40.0, "travel", "2024-06-08", ""),
            expense(5, 50.0, "travel", "2024-06-07", ""),
            expense(6, 60.0, "bike", "2024-06-20", ""),
            expense(7, 70.0, "health", "2023-06-15", ""),
            expense(8, 80.0, "other", "someday", ""),
        ]
    }

    const TODAY: &str = "2024-06-15";

    #[test]
    fn test_today() {
        let records = sample();
        let got = filter_by_period(&records, Period::Today, None, day(TODAY));
        assert_eq!(ids(&got), vec![1]);
    }

    #[test]
    fn test_week_is_eight_days_and_open_ended() {
        let records = sample();
        let got = filter_by_period(&records, Period::Week, None, day(TODAY));
        assert_eq!(ids(&got), vec![1, 2, 4, 6]);
    }

    #[test]
    fn test_month_defaults_to_current() {
        let records = sample();
        let got = filter_by_period(&records, Period::Month, None, day(TODAY));
        assert_eq!(ids(&got), vec![1, 2, 4, 5, 6]);
    }

    #[test]
    fn test_month_with_custom_value() {
        let records = sample();
        let got = filter_by_period(&records, Period::Month, Some("2024-05"), day(TODAY));
        assert_eq!(ids(&got), vec![3]);
    }

    #[test]
    fn test_invalid_custom_month_falls_back() {
        let records = sample();
        let current = ids(&filter_by_period(&records, Period::Month, None, day(TODAY)));
        for bad in ["2024-5", "abcd-ef", "", "2024-05-01", " 2024-05"] {
            let got = filter_by_period(&records, Period::Month, Some(bad), day(TODAY));
            assert_eq!(ids(&got), current, "custom month {bad:?}");
        }
    }

    #[test]
    fn test_out_of_range_custom_month_matches_nothing() {
        let records = sample();
        assert!(filter_by_period(&records, Period::Month, Some("2024-13"), day(TODAY)).is_empty());
    }

    #[test]
    fn test_custom_month_ignored_outside_month() {
        let records = sample();
        let got = filter_by_period(&records, Period::Today, Some("2024-05"), day(TODAY));
        assert_eq!(ids(&got), vec![1]);
    }

    #[test]
    fn test_year() {
        let records = sample();
        let got = filter_by_period(&records, Period::Year, None, day(TODAY));
        assert_eq!(ids(&got), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_all_keeps_unreadable_dates() {
        let records = sample();
        let got = filter_by_period(&records, Period::All, None, day(TODAY));
        assert_eq!(got.len(), records.len());
    }

    #[test]
    fn test_period_from_name() {
        assert_eq!(Period::from_name("today"), Period::Today);
        assert_eq!(Period::from_name("Week"), Period::Week);
        assert_eq!(Period::from_name("month"), Period::Month);
        assert_eq!(Period::from_name("year"), Period::Year);
        assert_eq!(Period::from_name("all"), Period::All);
        assert_eq!(Period::from_name("fortnight"), Period::All);
    }

    #[test]
    fn test_boundary_dates() {
        let today = day(TODAY);
        let yesterday = day("2024-06-14");
        let last_month = day("2024-05-15");
        let may = YearMonth::parse("2024-05");
        assert!(in_period(today, Period::Today, None, today));
        assert!(!in_period(yesterday, Period::Today, None, today));
        assert!(in_period(yesterday, Period::Week, None, today));
        assert!(!in_period(last_month, Period::Today, None, today));
        assert!(!in_period(last_month, Period::Week, None, today));
        assert!(!in_period(last_month, Period::Month, None, today));
        assert!(in_period(last_month, Period::Month, may, today));
    }

    #[test]
    fn test_search_matches_amount_text() {
        let records = sample();
        let all = filter_by_period(&records, Period::All, None, day(TODAY));
        assert_eq!(ids(&search(&all, "50", None)), vec![5]);
    }

    #[test]
    fn test_search_case_insensitive_description_and_category() {
        let records = sample();
        let all = filter_by_period(&records, Period::All, None, day(TODAY));
        assert_eq!(ids(&search(&all, "LUNCH", None)), vec![1]);
        assert_eq!(ids(&search(&all, "trav", None)), vec![4, 5]);
    }

    #[test]
    fn test_search_empty_term_and_category_filter() {
        let records = sample();
        let all = filter_by_period(&records, Period::All, None, day(TODAY));
        assert_eq!(search(&all, "", None).len(), records.len());
        assert_eq!(search(&all, "", Some("")).len(), records.len());
        assert_eq!(ids(&search(&all, "", Some("food"))), vec![1, 2]);
        assert_eq!(ids(&search(&all, "20", Some("food"))), vec![2]);
        assert!(search(&all, "20", Some("rent")).is_empty());
    }

    #[test]
    fn test_amount_text() {
        assert_eq!(amount_text(50.0), "50");
        assert_eq!(amount_text(12.5), "12.5");
        assert_eq!(amount_text(1e21), "1000000000000000000000");
        assert_eq!(amount_text(1e-7), "0.0000001");
    }

    #[test]
    fn test_view_state_transitions() {
        let mut view = ViewState::default();
        assert_eq!(view.period(), Period::Today);

        view.set_custom_month("2024-05");
        assert_eq!(view.custom_month(), None);

        view.select_period(Period::Month, Some("2024-06"));
        assert_eq!(view.custom_month(), Some("2024-06"));
        view.set_custom_month("2024-05");
        assert_eq!(view.custom_month(), Some("2024-05"));

        view.select_period(Period::Week, Some("2024-05"));
        assert_eq!(view.custom_month(), None);
    }

    #[test]
    fn test_view_state_filter_and_label() {
        let records = sample();
        let today = day(TODAY);
        let mut view = ViewState::default();
        view.select_period(Period::Month, Some("2024-05"));
        assert_eq!(ids(&view.filter(&records, today)), vec![3]);
        assert_eq!(view.label(today), "2024-05");
        view.set_custom_month("2024-06");
        assert_eq!(view.label(today), "This Month");
        view.select_period(Period::All, None);
        assert_eq!(view.label(today), "All Time");
    }
}
