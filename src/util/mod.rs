use chrono::{Datelike, Days, NaiveDate};

/// First and last day of a year
pub(crate) fn year_of(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first_day = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let last_day = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some((first_day, last_day))
}

/// First and last day of a month (1-based). The last day is "day 0" of the following month,
/// i.e. the day before its 1st, so month lengths and leap years come out of chrono.
pub(crate) fn month_of(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = next_month(year, month);
    let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((first_day, last_day))
}

/// Month before the given one, wrapping into the previous year
pub(crate) fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Zero-based quarter index (0..=3) of a date
pub(crate) fn quarter_index(date: NaiveDate) -> u32 {
    date.month0() / 3
}

/// First and last day of a quarter given by its zero-based index.
/// Quarters start at January, April, July and October.
pub(crate) fn quarter_of(year: i32, quarter: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first_month = quarter * 3 + 1;
    let (first_day, _) = month_of(year, first_month)?;
    let (_, last_day) = month_of(year, first_month + 2)?;
    Some((first_day, last_day))
}

/// Quarter before the given one; Q1 wraps to Q4 of the previous year
pub(crate) fn previous_quarter(year: i32, quarter: u32) -> (i32, u32) {
    if quarter == 0 { (year - 1, 3) } else { (year, quarter - 1) }
}

/// Monday and Sunday of the week containing `date`. Weeks start on Monday.
pub(crate) fn week_of(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let monday = date.checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))?;
    let sunday = monday.checked_add_days(Days::new(6))?;
    Some((monday, sunday))
}
