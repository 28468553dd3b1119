use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Number of days shown in the week strip
pub const WEEK_LEN: usize = 7;

/// Full English weekday name, used as the note key for daily habits
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The seven consecutive dates of the week containing `today`,
/// starting on `week_start`.
pub fn week_containing(today: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
    let offset = (7 + today.weekday().num_days_from_monday()
        - week_start.num_days_from_monday())
        % 7;
    let first = today - Duration::days(i64::from(offset));
    (0..WEEK_LEN as i64)
        .map(|i| first + Duration::days(i))
        .collect()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a month anchor by `delta` months. Out-of-range shifts leave the
/// anchor unchanged.
pub fn shift_month(anchor: NaiveDate, delta: i32) -> NaiveDate {
    let start = month_start(anchor);
    let shifted = if delta >= 0 {
        start.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        start.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(start)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let start = month_start(date);
    match start.checked_add_months(Months::new(1)) {
        Some(next) => (next - start).num_days() as u32,
        None => 31,
    }
}

/// Month grid rows for a calendar view. Each row has seven slots, `None`
/// for padding days outside the month.
pub fn month_grid(anchor: NaiveDate, week_start: Weekday) -> Vec<[Option<NaiveDate>; 7]> {
    let start = month_start(anchor);
    let lead = (7 + start.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    let total = days_in_month(start);

    let mut rows = Vec::new();
    let mut row: [Option<NaiveDate>; 7] = [None; 7];
    let mut slot = lead as usize;
    for day in 0..total {
        row[slot] = Some(start + Duration::days(i64::from(day)));
        slot += 1;
        if slot == 7 {
            rows.push(row);
            row = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        rows.push(row);
    }
    rows
}

/// Storage form of a date (`YYYY-MM-DD`)
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` string
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2025-05-14 is a Wednesday
        let week = week_containing(d(2025, 5, 14), Weekday::Sun);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0], d(2025, 5, 11));
        assert_eq!(week[6], d(2025, 5, 17));
        assert!(week.contains(&d(2025, 5, 14)));
    }

    #[test]
    fn test_week_starts_on_monday() {
        let week = week_containing(d(2025, 5, 11), Weekday::Mon);
        assert_eq!(week[0], d(2025, 5, 5));
        assert_eq!(week[6], d(2025, 5, 11));
    }

    #[test]
    fn test_week_crosses_year_boundary() {
        let week = week_containing(d(2025, 1, 1), Weekday::Sun);
        assert_eq!(week[0], d(2024, 12, 29));
        assert_eq!(week[3], d(2025, 1, 1));
    }

    #[test]
    fn test_shift_month_both_ways() {
        assert_eq!(shift_month(d(2025, 1, 31), 1), d(2025, 2, 1));
        assert_eq!(shift_month(d(2025, 1, 15), -1), d(2024, 12, 1));
        assert_eq!(shift_month(d(2025, 3, 3), 0), d(2025, 3, 1));
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(d(2024, 2, 10)), 29);
        assert_eq!(days_in_month(d(2025, 2, 10)), 28);
        assert_eq!(days_in_month(d(2025, 12, 1)), 31);
    }

    #[test]
    fn test_month_grid_pads_leading_days() {
        // May 2025 starts on a Thursday
        let grid = month_grid(d(2025, 5, 20), Weekday::Sun);
        assert_eq!(grid[0][0], None);
        assert_eq!(grid[0][4], Some(d(2025, 5, 1)));
        let days: usize = grid.iter().map(|r| r.iter().flatten().count()).sum();
        assert_eq!(days, 31);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }

    #[test]
    fn test_date_key_format() {
        assert_eq!(date_key(d(2025, 5, 4)), "2025-05-04");
        assert_eq!(parse_date(" 2025-05-04 "), Some(d(2025, 5, 4)));
        assert_eq!(parse_date("05/04/2025"), None);
    }
}
