//! Row-level decoding of stored entry lists, and the one-time migration
//! from the legacy storage layout.
//!
//! Older builds saved entries under `bmiData` with the BMI as a string
//! (`"22.9"`). The canonical layout is `bmiDataArray` with a numeric BMI.
//! Migration copies the legacy list forward once; after the canonical
//! key exists it is never consulted again.

use crate::bmi::{bmi_from, round_one_decimal};
use crate::store::{ENTRIES_KEY, LEGACY_ENTRIES_KEY};
use crate::{BmiEntry, KeyValueStore, Measurement, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// BMI as older builds stored it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyBmi {
    Number(f64),
    Text(String),
}

/// Entry row in the legacy shape
#[derive(Debug, Deserialize)]
struct LegacyEntry {
    weight: f64,
    height: f64,
    bmi: Option<LegacyBmi>,
    date: DateTime<Utc>,
}

impl LegacyEntry {
    /// Normalize into the canonical shape; `None` if weight or height are unusable
    fn into_entry(self) -> Option<BmiEntry> {
        let weight = Measurement::new(self.weight).ok()?;
        let height = Measurement::new(self.height).ok()?;

        let stored = match self.bmi {
            Some(LegacyBmi::Number(n)) => Some(n),
            Some(LegacyBmi::Text(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
            None => None,
        };
        let bmi = match stored {
            Some(n) if n.is_finite() && n > 0.0 => round_one_decimal(n),
            _ => bmi_from(weight, height),
        };

        Some(BmiEntry {
            weight: weight.value(),
            height: height.value(),
            bmi,
            date: self.date,
        })
    }
}

/// Entries recovered from a stored list
#[derive(Debug, Default)]
pub(crate) struct DecodedEntries {
    pub entries: Vec<BmiEntry>,
    /// Rows that could not be turned into an entry
    pub rejected: usize,
}

/// Decode a stored list row by row. Rows in the canonical shape are taken
/// as-is, legacy rows are normalized, anything else is counted as rejected.
///
/// Returns `None` when the value is not a JSON array at all.
pub(crate) fn decode_entries(raw: &str) -> Option<DecodedEntries> {
    let rows: Vec<Value> = match serde_json::from_str(raw) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("Stored entry list is not a JSON array: {}", e);
            return None;
        }
    };

    let mut decoded = DecodedEntries::default();
    for (position, row) in rows.into_iter().enumerate() {
        let entry = serde_json::from_value::<BmiEntry>(row.clone()).ok().or_else(|| {
            serde_json::from_value::<LegacyEntry>(row)
                .ok()
                .and_then(LegacyEntry::into_entry)
        });
        match entry {
            Some(entry) => decoded.entries.push(entry),
            None => {
                tracing::warn!("Skipping unreadable entry at position {}", position);
                decoded.rejected += 1;
            }
        }
    }
    Some(decoded)
}

/// Copy legacy entries to the canonical key if it has never been written.
///
/// Returns the number of entries migrated. Unreadable legacy data is
/// logged and skipped rather than failing the caller.
pub fn migrate_legacy<S: KeyValueStore>(kv: &mut S) -> Result<usize> {
    if kv.get(ENTRIES_KEY)?.is_some() {
        return Ok(0);
    }

    let Some(raw) = kv.get(LEGACY_ENTRIES_KEY)? else {
        return Ok(0);
    };

    let Some(decoded) = decode_entries(&raw) else {
        tracing::warn!("Ignoring unreadable legacy data under {:?}", LEGACY_ENTRIES_KEY);
        return Ok(0);
    };
    if decoded.rejected > 0 {
        tracing::warn!("Dropped {} unreadable legacy entries", decoded.rejected);
    }

    let entries = decoded.entries;
    kv.set(ENTRIES_KEY, &serde_json::to_string(&entries)?)?;

    tracing::info!(
        "Migrated {} entries from {:?} to {:?}",
        entries.len(),
        LEGACY_ENTRIES_KEY,
        ENTRIES_KEY
    );
    Ok(entries.len())
}
