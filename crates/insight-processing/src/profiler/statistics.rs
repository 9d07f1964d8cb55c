//! Descriptive statistics for numeric columns.

use crate::error::{ProcessingError, Result};
use crate::types::NumericSummary;
use polars::prelude::*;

/// Whether a dtype is summarized by `describe`.
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Summarize the non-null values of a numeric series.
pub(crate) fn summarize(series: &Series) -> Result<NumericSummary> {
    let name = series.name().to_string();
    let float_series = series.drop_nulls().cast(&DataType::Float64)?;
    let mut values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
    if values.is_empty() {
        return Err(ProcessingError::NoValidValues(name));
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    Ok(NumericSummary {
        column: name,
        count: n,
        mean,
        std: sample_std(&values, mean),
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[n - 1],
    })
}

/// Sample standard deviation; zero for fewer than two values.
pub(crate) fn sample_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

/// Quantile of sorted values with linear interpolation between ranks.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 1.0), 4.0);
    }

    #[test]
    fn test_sample_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = sample_std(&values, 5.0);
        assert!((std - 2.138_089_935).abs() < 1e-6);
        assert_eq!(sample_std(&[3.0], 3.0), 0.0);
    }

    #[test]
    fn test_summarize_skips_nulls() {
        let series = Series::new("Salary_USD".into(), &[Some(10.0), None, Some(30.0), Some(20.0)]);
        let summary = summarize(&series).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean, 20.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.median, 20.0);
        assert_eq!(summary.max, 30.0);
    }

    #[test]
    fn test_summarize_all_null() {
        let series = Series::new("x".into(), &[None::<f64>, None]);
        assert!(matches!(
            summarize(&series),
            Err(ProcessingError::NoValidValues(_))
        ));
    }

    #[test]
    fn test_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(!is_numeric_dtype(&DataType::String));
    }
}
