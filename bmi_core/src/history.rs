//! Display rows for the history table.

use crate::bmi::classify;
use crate::{BmiCategory, BmiEntry};
use chrono::{Local, TimeZone};

/// One formatted table row
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRow {
    /// Position in the entry list, used for edit and delete
    pub index: usize,
    pub date: String,
    pub weight: String,
    pub bmi: String,
    pub category: BmiCategory,
    /// Background colour for the BMI cell
    pub color: &'static str,
}

/// Rows for every entry in recording order, dates in local time
pub fn history_rows(entries: &[BmiEntry]) -> Vec<HistoryRow> {
    history_rows_in(entries, &Local)
}

pub fn history_rows_in<Tz: TimeZone>(entries: &[BmiEntry], tz: &Tz) -> Vec<HistoryRow>
where
    Tz::Offset: std::fmt::Display,
{
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let category = classify(entry.bmi);
            HistoryRow {
                index,
                date: entry.date.with_timezone(tz).format("%d.%m.%Y").to_string(),
                weight: format!("{:.1}", entry.weight),
                bmi: format!("{:.1}", entry.bmi),
                category,
                color: category.color(),
            }
        })
        .collect()
}
