//! Dataset profiling for the dashboard pages.
//!
//! This module provides:
//! - Shape and per-column metadata ([`DatasetProfiler::overview`])
//! - Descriptive statistics of numeric columns ([`DatasetProfiler::describe`])
//! - Null, duplicate and cardinality checks ([`DatasetProfiler::cleaning_report`])
//! - Class distributions and filtered sample tables

mod distribution;
mod statistics;

use crate::dataset::JobDataset;
use crate::error::Result;
use crate::schema::{Field, SALARY_COLUMN, SALARY_DESCRIPTION};
use crate::types::{
    CleaningReport, ColumnCount, ColumnInfo, DatasetOverview, NumericSummary, UniqueValues,
};
use polars::prelude::*;
use tracing::debug;

pub use distribution::{class_distribution, class_samples, samples_per_class};
pub(crate) use statistics::is_numeric_dtype;

/// Profiler over a loaded [`JobDataset`].
pub struct DatasetProfiler;

impl DatasetProfiler {
    /// Shape, dtypes, null counts and column descriptions.
    pub fn overview(dataset: &JobDataset) -> DatasetOverview {
        let df = dataset.dataframe();
        let column_info = df
            .get_columns()
            .iter()
            .map(|col| {
                let name = col.name().to_string();
                ColumnInfo {
                    description: column_description(&name),
                    dtype: format!("{:?}", col.dtype()),
                    null_count: col.null_count(),
                    name,
                }
            })
            .collect();

        DatasetOverview {
            rows: df.height(),
            columns: df.width(),
            column_info,
        }
    }

    /// Summary statistics for every numeric column.
    pub fn describe(dataset: &JobDataset) -> Result<Vec<NumericSummary>> {
        dataset
            .dataframe()
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| statistics::summarize(col.as_materialized_series()))
            .collect()
    }

    /// Null counts, duplicates, column kinds and unique values.
    pub fn cleaning_report(dataset: &JobDataset) -> Result<CleaningReport> {
        let df = dataset.dataframe();

        let null_counts = df
            .get_columns()
            .iter()
            .map(|col| ColumnCount::new(col.name().as_str(), col.null_count()))
            .collect();

        let duplicate_rows = df.height()
            - df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
                .height();
        let duplicate_percentage = if df.height() > 0 {
            (duplicate_rows as f64 / df.height() as f64) * 100.0
        } else {
            0.0
        };

        let mut categorical_columns = Vec::new();
        let mut numeric_columns = Vec::new();
        let mut unique_counts = Vec::new();
        let mut unique_values = Vec::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            let series = col.as_materialized_series().drop_nulls();
            unique_counts.push(ColumnCount::new(name.clone(), series.n_unique()?));

            if is_numeric_dtype(col.dtype()) {
                numeric_columns.push(name);
            } else {
                let distinct = series.unique_stable()?.cast(&DataType::String)?;
                let values = distinct
                    .str()?
                    .into_iter()
                    .flatten()
                    .map(str::to_string)
                    .collect();
                unique_values.push(UniqueValues {
                    column: name.clone(),
                    values,
                });
                categorical_columns.push(name);
            }
        }

        debug!(
            "Cleaning report: {} duplicates, {} categorical, {} numeric columns",
            duplicate_rows,
            categorical_columns.len(),
            numeric_columns.len()
        );

        Ok(CleaningReport {
            null_counts,
            duplicate_rows,
            duplicate_percentage,
            categorical_columns,
            numeric_columns,
            unique_counts,
            unique_values,
        })
    }
}

fn column_description(name: &str) -> Option<String> {
    if name == SALARY_COLUMN {
        return Some(SALARY_DESCRIPTION.to_string());
    }
    Field::from_column_name(name).map(|f| f.description().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_dataset;

    #[test]
    fn test_overview() {
        let overview = DatasetProfiler::overview(&sample_dataset());
        assert_eq!(overview.rows, 3);
        // ten source columns plus the derived category
        assert_eq!(overview.columns, 11);
        let category = overview
            .column_info
            .iter()
            .find(|c| c.name == "Salary_Category")
            .unwrap();
        assert_eq!(category.null_count, 1);
        assert!(overview.column_info.iter().all(|c| c.description.is_some()));
    }

    #[test]
    fn test_describe_only_salary() {
        let summaries = DatasetProfiler::describe(&sample_dataset()).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].column, "Salary_USD");
        assert_eq!(summaries[0].count, 3);
        assert_eq!(summaries[0].median, 120_000.0);
    }

    #[test]
    fn test_cleaning_report() {
        let report = DatasetProfiler::cleaning_report(&sample_dataset()).unwrap();
        assert_eq!(report.duplicate_rows, 0);
        assert_eq!(report.numeric_columns, vec!["Salary_USD"]);
        assert_eq!(report.categorical_columns.len(), 10);
        assert_eq!(report.total_nulls(), 1);

        let titles = report
            .unique_values
            .iter()
            .find(|u| u.column == "Job_Title")
            .unwrap();
        assert_eq!(titles.values, vec!["Data Scientist", "HR Manager"]);

        let title_count = report
            .unique_counts
            .iter()
            .find(|c| c.column == "Job_Title")
            .unwrap();
        assert_eq!(title_count.count, 2);
    }
}
