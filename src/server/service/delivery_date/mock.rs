//! Generated delivery dates used when live data is disabled or unavailable.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

use crate::{model::delivery_date::DeliveryDate, server::util::time::DateFormatter};

/// Number of weekday dates generated.
pub const MOCK_DATE_COUNT: usize = 14;
/// Calendar days scanned at most; 20 days always contain at least 14 weekdays.
pub const MOCK_SCAN_DAYS: i64 = 20;

/// Generates the weekdays following `today`.
///
/// Walks forward from tomorrow skipping Saturdays and Sundays until [`MOCK_DATE_COUNT`] dates are
/// collected or [`MOCK_SCAN_DAYS`] days have been scanned. Pure: the same `today` and formatter
/// always produce the same sequence.
pub fn generate_mock_delivery_dates(today: NaiveDate, formatter: &DateFormatter) -> Vec<DeliveryDate> {
    (1..=MOCK_SCAN_DAYS)
        .filter_map(|offset| today.checked_add_signed(TimeDelta::days(offset)))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .take(MOCK_DATE_COUNT)
        .map(|date| DeliveryDate {
            date,
            display_name: formatter.display_name(date),
        })
        .collect()
}
