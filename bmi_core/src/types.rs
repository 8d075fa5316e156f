//! Core domain types for the BMI journal.
//!
//! This module defines:
//! - Validated measurements (weight in kg, height in cm)
//! - Recorded entries and their serialized shape
//! - BMI categories with their display label and colour
//! - The height policy used when an entry is edited

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Measurements
// ============================================================================

/// A positive, finite real number (kilograms or centimetres)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Measurement(f64);

impl Measurement {
    /// Validate a raw number
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "expected a positive number, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Measurement {
    type Err = Error;

    /// Parses user input, accepting a comma as the decimal separator.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace(',', ".");
        let value: f64 = normalized
            .parse()
            .map_err(|_| Error::InvalidInput(format!("'{}' is not a number", s.trim())))?;
        Self::new(value)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything the presentation layer may hand over as a weight or height
pub trait IntoMeasurement {
    fn into_measurement(self) -> Result<Measurement>;
}

impl IntoMeasurement for Measurement {
    fn into_measurement(self) -> Result<Measurement> {
        Ok(self)
    }
}

impl IntoMeasurement for f64 {
    fn into_measurement(self) -> Result<Measurement> {
        Measurement::new(self)
    }
}

impl IntoMeasurement for &str {
    fn into_measurement(self) -> Result<Measurement> {
        self.parse()
    }
}

impl IntoMeasurement for &String {
    fn into_measurement(self) -> Result<Measurement> {
        self.as_str().parse()
    }
}

impl IntoMeasurement for String {
    fn into_measurement(self) -> Result<Measurement> {
        self.as_str().parse()
    }
}

// ============================================================================
// Entries
// ============================================================================

/// One recorded measurement, as persisted
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiEntry {
    /// Body weight in kilograms
    pub weight: f64,
    /// Height in centimetres
    pub height: f64,
    /// weight / (height/100)², one decimal
    pub bmi: f64,
    /// Moment of recording
    pub date: DateTime<Utc>,
}

/// Result of a successful `record_today`
#[derive(Clone, Debug, PartialEq)]
pub struct RecordOutcome {
    pub entry: BmiEntry,
    pub category: BmiCategory,
}

/// Which height to use when an edited entry's BMI is recomputed
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EditHeight {
    /// The height stored on the entry itself
    #[default]
    Stored,
    /// A fixed reference height in centimetres, regardless of the entry
    ReferenceCm(f64),
}

/// Reference height the legacy edit screen assumed (1.70 m)
pub const LEGACY_REFERENCE_HEIGHT_CM: f64 = 170.0;

// ============================================================================
// Categories
// ============================================================================

/// BMI classification bands
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    #[serde(rename = "obese_1")]
    Obese1,
    #[serde(rename = "obese_2")]
    Obese2,
}

impl BmiCategory {
    /// Phrase completing "You are: ..."
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Healthy => "at a healthy weight",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese1 => "obese (stage 1)",
            BmiCategory::Obese2 => "obese (stage 2)",
        }
    }

    /// Cell colour in the history table
    pub fn color(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "#4ea8ff",
            BmiCategory::Healthy => "#4cff7a",
            BmiCategory::Overweight => "#ffe84c",
            BmiCategory::Obese1 => "#ff6906",
            BmiCategory::Obese2 => "#f71717",
        }
    }

    /// Stable identifier, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Healthy => "healthy",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese1 => "obese_1",
            BmiCategory::Obese2 => "obese_2",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
