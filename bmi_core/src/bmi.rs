//! BMI arithmetic and classification.
//!
//! Both functions are pure; validation happens while converting the
//! inputs into [`Measurement`]s.

use crate::{BmiCategory, IntoMeasurement, Measurement, Result};

/// Compute BMI from a weight (kg) and height (cm), rounded to one decimal.
///
/// Inputs may be numbers or user-entered strings such as `"72,5"`.
/// Fails with `InvalidInput` when either value is not a positive number.
pub fn compute_bmi(weight: impl IntoMeasurement, height: impl IntoMeasurement) -> Result<f64> {
    let weight = weight.into_measurement()?;
    let height = height.into_measurement()?;
    Ok(bmi_from(weight, height))
}

/// BMI for already validated measurements
pub fn bmi_from(weight: Measurement, height: Measurement) -> f64 {
    let meters = height.value() / 100.0;
    round_one_decimal(weight.value() / (meters * meters))
}

/// Round half away from zero to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Map a BMI value onto its band. Lower bounds are inclusive.
pub fn classify(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Healthy
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else if bmi < 35.0 {
        BmiCategory::Obese1
    } else {
        BmiCategory::Obese2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_compute_bmi_reference_value() {
        assert_eq!(compute_bmi(70.0, 175.0).unwrap(), 22.9);
        assert_eq!(compute_bmi("70", "175").unwrap(), 22.9);
    }

    #[test]
    fn test_compute_bmi_comma_input() {
        assert_eq!(compute_bmi("72,5", "180").unwrap(), 22.4);
        assert_eq!(compute_bmi("100", "1,8e2").unwrap(), 30.9);
    }

    #[test]
    fn test_compute_bmi_invalid_input() {
        assert!(matches!(compute_bmi(0.0, 175.0), Err(Error::InvalidInput(_))));
        assert!(matches!(compute_bmi(70.0, -1.0), Err(Error::InvalidInput(_))));
        assert!(matches!(compute_bmi("seventy", "175"), Err(Error::InvalidInput(_))));
        assert!(matches!(compute_bmi("70", ""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(22.857), 22.9);
        assert_eq!(round_one_decimal(18.44), 18.4);
        assert_eq!(round_one_decimal(30.0), 30.0);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(12.0), BmiCategory::Underweight);
        assert_eq!(classify(18.4), BmiCategory::Underweight);
        assert_eq!(classify(18.5), BmiCategory::Healthy);
        assert_eq!(classify(24.9), BmiCategory::Healthy);
        assert_eq!(classify(25.0), BmiCategory::Overweight);
        assert_eq!(classify(29.9), BmiCategory::Overweight);
        assert_eq!(classify(30.0), BmiCategory::Obese1);
        assert_eq!(classify(34.9), BmiCategory::Obese1);
        assert_eq!(classify(35.0), BmiCategory::Obese2);
        assert_eq!(classify(52.3), BmiCategory::Obese2);
    }
}
