use chrono::{Datelike, NaiveDate, Weekday};

/// Monday through Friday. No holiday calendar.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Working days in the inclusive range `[start, end]`, walked day by day.
/// Both endpoints count when they fall on a weekday. `start > end` yields 0.
pub fn working_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    working_days(start, end).count() as u32
}

/// Iterator over the working days of the inclusive range `[start, end]`.
pub fn working_days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |d| *d <= end)
        .filter(|d| is_working_day(*d))
}
