//! Salary bucketing.
//!
//! Buckets use an inclusive lower bound and an exclusive upper bound:
//! `[0, 50000)`, `[50000, 100000)`, `[100000, 200000)`. Anything else is
//! [`SalaryBucket::Unclassified`].

use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (exclusive) of the entry level bucket.
pub const ENTRY_LEVEL_CEILING: f64 = 50_000.0;
/// Upper bound (exclusive) of the mid level bucket.
pub const MID_LEVEL_CEILING: f64 = 100_000.0;
/// Upper bound (exclusive) of the senior level bucket.
pub const SENIOR_LEVEL_CEILING: f64 = 200_000.0;

/// Salary category derived from `Salary_USD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryBucket {
    EntryLevel,
    MidLevel,
    SeniorLevel,
    /// Negative, non-finite, or `>= 200000`.
    Unclassified,
}

impl SalaryBucket {
    /// The three buckets a salary can land in, in ascending order.
    pub const CLASSIFIED: [SalaryBucket; 3] = [
        SalaryBucket::EntryLevel,
        SalaryBucket::MidLevel,
        SalaryBucket::SeniorLevel,
    ];

    /// Bucket a salary. Never fails; out-of-range input is `Unclassified`.
    pub fn classify(salary: f64) -> Self {
        if !salary.is_finite() || salary < 0.0 {
            SalaryBucket::Unclassified
        } else if salary < ENTRY_LEVEL_CEILING {
            SalaryBucket::EntryLevel
        } else if salary < MID_LEVEL_CEILING {
            SalaryBucket::MidLevel
        } else if salary < SENIOR_LEVEL_CEILING {
            SalaryBucket::SeniorLevel
        } else {
            SalaryBucket::Unclassified
        }
    }

    /// Bucket a salary, surfacing unclassified values as errors.
    ///
    /// Non-finite input is [`ProcessingError::InvalidSalary`]; finite input
    /// outside every bucket is [`ProcessingError::OutOfRangeSalary`].
    pub fn require(salary: f64) -> Result<Self> {
        if !salary.is_finite() {
            return Err(ProcessingError::InvalidSalary(format!(
                "{salary} is not a finite number"
            )));
        }
        match Self::classify(salary) {
            SalaryBucket::Unclassified => Err(ProcessingError::OutOfRangeSalary(salary)),
            bucket => Ok(bucket),
        }
    }

    /// Category label as it appears in the derived column.
    pub fn label(self) -> Option<&'static str> {
        match self {
            SalaryBucket::EntryLevel => Some("Entry Level"),
            SalaryBucket::MidLevel => Some("Mid Level"),
            SalaryBucket::SeniorLevel => Some("Senior Level"),
            SalaryBucket::Unclassified => None,
        }
    }

    pub fn is_classified(self) -> bool {
        self != SalaryBucket::Unclassified
    }
}

impl fmt::Display for SalaryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("Unclassified"))
    }
}

/// Shorthand for [`SalaryBucket::classify`].
pub fn bucket(salary: f64) -> SalaryBucket {
    SalaryBucket::classify(salary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(bucket(0.0), SalaryBucket::EntryLevel);
        assert_eq!(bucket(49_999.0), SalaryBucket::EntryLevel);
        assert_eq!(bucket(50_000.0), SalaryBucket::MidLevel);
        assert_eq!(bucket(99_999.0), SalaryBucket::MidLevel);
        assert_eq!(bucket(100_000.0), SalaryBucket::SeniorLevel);
        assert_eq!(bucket(199_999.0), SalaryBucket::SeniorLevel);
        assert_eq!(bucket(200_000.0), SalaryBucket::Unclassified);
    }

    #[test]
    fn test_fractional_values_near_boundaries() {
        assert_eq!(bucket(49_999.99), SalaryBucket::EntryLevel);
        assert_eq!(bucket(199_999.99), SalaryBucket::SeniorLevel);
    }

    #[test]
    fn test_negative_and_non_finite() {
        assert_eq!(bucket(-1.0), SalaryBucket::Unclassified);
        assert_eq!(bucket(f64::NAN), SalaryBucket::Unclassified);
        assert_eq!(bucket(f64::INFINITY), SalaryBucket::Unclassified);
    }

    #[test]
    fn test_require() {
        assert_eq!(
            SalaryBucket::require(120_000.0).unwrap(),
            SalaryBucket::SeniorLevel
        );
        assert!(matches!(
            SalaryBucket::require(250_000.0),
            Err(ProcessingError::OutOfRangeSalary(v)) if v == 250_000.0
        ));
        assert!(matches!(
            SalaryBucket::require(-10.0),
            Err(ProcessingError::OutOfRangeSalary(_))
        ));
        assert!(matches!(
            SalaryBucket::require(f64::NAN),
            Err(ProcessingError::InvalidSalary(_))
        ));
    }

    #[test]
    fn test_labels() {
        assert_eq!(SalaryBucket::MidLevel.label(), Some("Mid Level"));
        assert_eq!(SalaryBucket::Unclassified.label(), None);
        assert_eq!(SalaryBucket::Unclassified.to_string(), "Unclassified");
    }
}
