//! The entry store: single authority over recorded BMI entries.
//!
//! Every mutation is a read-modify-write of the full list under one key.
//! Callers get owned snapshots back and re-read to observe later changes.

use crate::bmi::{bmi_from, classify};
use crate::migrate::decode_entries;
use crate::{
    BmiEntry, EditHeight, Error, IntoMeasurement, KeyValueStore, Measurement, RecordOutcome,
    Result,
};
use chrono::{DateTime, Local, TimeZone, Utc};

/// Key holding the serialized entry list
pub const ENTRIES_KEY: &str = "bmiDataArray";

/// Key used by older builds, read only by the migration
pub const LEGACY_ENTRIES_KEY: &str = "bmiData";

/// Key receiving the previous value when damaged data is about to be replaced
pub const CORRUPT_ENTRIES_KEY: &str = "bmiDataArray-corrupt";

/// Entry store over any key-value backend
#[derive(Debug)]
pub struct EntryStore<S> {
    kv: S,
    edit_height: EditHeight,
}

impl<S: KeyValueStore> EntryStore<S> {
    /// Wrap a backend, editing with each entry's stored height
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            edit_height: EditHeight::Stored,
        }
    }

    /// Wrap a backend and run the legacy migration once.
    ///
    /// A failed migration is logged and the store is still usable, so
    /// reads degrade to an empty history instead of failing.
    pub fn open(kv: S) -> Self {
        let mut store = Self::new(kv);
        if let Err(e) = crate::migrate::migrate_legacy(&mut store.kv) {
            tracing::warn!("Skipping legacy data migration: {}", e);
        }
        store
    }

    pub fn with_edit_height(mut self, policy: EditHeight) -> Self {
        self.edit_height = policy;
        self
    }

    pub fn edit_height(&self) -> EditHeight {
        self.edit_height
    }

    /// Access the backend, e.g. for inspection in tests
    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub fn into_backend(self) -> S {
        self.kv
    }

    /// Record today's entry using the local clock
    pub fn record_today(
        &mut self,
        weight: impl IntoMeasurement,
        height: impl IntoMeasurement,
    ) -> Result<RecordOutcome> {
        self.record_at(weight, height, Local::now())
    }

    /// Record an entry at `now`, rejecting a second entry on the same
    /// calendar day in `now`'s time zone.
    pub fn record_at<Tz: TimeZone>(
        &mut self,
        weight: impl IntoMeasurement,
        height: impl IntoMeasurement,
        now: DateTime<Tz>,
    ) -> Result<RecordOutcome> {
        // Validate before touching storage
        let weight = weight.into_measurement()?;
        let height = height.into_measurement()?;
        let bmi = bmi_from(weight, height);

        let mut entries = self.load_for_update()?;

        let today = now.date_naive();
        let tz = now.timezone();
        if entries
            .iter()
            .any(|e| e.date.with_timezone(&tz).date_naive() == today)
        {
            tracing::info!("Entry for {} already exists, not recording", today);
            return Err(Error::AlreadyRecordedToday);
        }

        let entry = BmiEntry {
            weight: weight.value(),
            height: height.value(),
            bmi,
            date: now.with_timezone(&Utc),
        };
        entries.push(entry.clone());
        self.save(&entries)?;

        let category = classify(bmi);
        tracing::info!(
            "Recorded {} kg / {} cm, BMI {} ({})",
            entry.weight,
            entry.height,
            entry.bmi,
            category
        );
        Ok(RecordOutcome { entry, category })
    }

    /// Snapshot of all entries in recording order.
    ///
    /// Missing, unreadable or malformed data yields an empty list; rows
    /// that cannot be decoded are left out.
    pub fn list_entries(&self) -> Vec<BmiEntry> {
        let raw = match self.kv.get(ENTRIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Unable to read entries: {}. Showing no history.", e);
                return Vec::new();
            }
        };

        match decode_entries(&raw) {
            Some(decoded) => {
                tracing::debug!(
                    "Loaded {} entries ({} unreadable)",
                    decoded.entries.len(),
                    decoded.rejected
                );
                decoded.entries
            }
            None => {
                tracing::warn!("Stored entries are malformed. Showing no history.");
                Vec::new()
            }
        }
    }

    /// Replace the weight at `index` and recompute its BMI
    pub fn edit_entry(
        &mut self,
        index: usize,
        new_weight: impl IntoMeasurement,
    ) -> Result<Vec<BmiEntry>> {
        let weight = new_weight.into_measurement()?;

        let mut entries = self.load_for_update()?;
        let len = entries.len();
        let entry = entries
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        let height = match self.edit_height {
            EditHeight::Stored => Measurement::new(entry.height).map_err(|_| {
                Error::Persistence(format!(
                    "entry {} has an invalid stored height of {} cm",
                    index, entry.height
                ))
            })?,
            EditHeight::ReferenceCm(cm) => Measurement::new(cm)
                .map_err(|_| Error::Config(format!("invalid reference height {}", cm)))?,
        };

        entry.weight = weight.value();
        entry.bmi = bmi_from(weight, height);
        tracing::info!(
            "Edited entry {}: {} kg, BMI {}",
            index,
            entry.weight,
            entry.bmi
        );

        self.save(&entries)?;
        Ok(entries)
    }

    /// Remove the entry at `index`; later entries shift down by one
    pub fn delete_entry(&mut self, index: usize) -> Result<Vec<BmiEntry>> {
        let mut entries = self.load_for_update()?;
        if index >= entries.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: entries.len(),
            });
        }

        let removed = entries.remove(index);
        tracing::info!("Deleted entry {} recorded at {}", index, removed.date);

        self.save(&entries)?;
        Ok(entries)
    }

    /// Read before a mutation. Backend failures propagate so a failed read
    /// never leads to overwriting history. If the stored value is damaged,
    /// it is copied to `CORRUPT_ENTRIES_KEY` before the readable rows are
    /// used, and a failed copy aborts the mutation.
    fn load_for_update(&mut self) -> Result<Vec<BmiEntry>> {
        let Some(raw) = self.kv.get(ENTRIES_KEY)? else {
            return Ok(Vec::new());
        };

        let decoded = decode_entries(&raw);
        let damaged = match &decoded {
            Some(d) => d.rejected > 0,
            None => !raw.trim().is_empty(),
        };
        if damaged {
            self.kv.set(CORRUPT_ENTRIES_KEY, &raw)?;
            tracing::warn!(
                "Stored entries were damaged; previous value kept under {:?}",
                CORRUPT_ENTRIES_KEY
            );
        }

        Ok(decoded.map(|d| d.entries).unwrap_or_default())
    }

    fn save(&mut self, entries: &[BmiEntry]) -> Result<()> {
        let contents = serde_json::to_string(entries)?;
        self.kv.set(ENTRIES_KEY, &contents).map_err(|e| {
            tracing::error!("Failed to persist {} entries: {}", entries.len(), e);
            e
        })
    }
}
