//! Option lists for dropdowns. All generators are pure; anything date-dependent
//! takes the reference date explicitly.

use std::num::NonZeroU64;

use chrono::{Datelike, Months, NaiveDate};

pub const MONTH_NAMES_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub fn day_options() -> Vec<String> {
    (1..=31).map(|d: u32| d.to_string()).collect()
}

pub fn month_options(names: &[String; 12]) -> Vec<String> {
    names.to_vec()
}

/// `count` consecutive years starting at the reference year.
pub fn year_options(reference: NaiveDate, count: u32) -> Vec<String> {
    (0..count as i32)
        .map(|i| (reference.year() + i).to_string())
        .collect()
}

/// `"<Month>/<Year>"` for `count` consecutive months starting at the reference month.
pub fn month_year_options(reference: NaiveDate, count: u32, names: &[String; 12]) -> Vec<String> {
    let first = reference.with_day(1).unwrap_or(reference);
    (0..count)
        .filter_map(|i| first.checked_add_months(Months::new(i)))
        .map(|d| format!("{}/{}", names[d.month0() as usize], d.year()))
        .collect()
}

/// Inclusive ascending range rendered as strings. Empty when `stop < start`.
pub fn numeric_range(start: i64, stop: i64, step: NonZeroU64) -> Vec<String> {
    (start..=stop)
        .step_by(usize::try_from(step.get()).unwrap_or(usize::MAX))
        .map(|v| v.to_string())
        .collect()
}
