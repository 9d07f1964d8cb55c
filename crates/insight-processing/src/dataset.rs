//! The job market table and its typed records.
//!
//! [`JobDataset`] keeps both the polars [`DataFrame`] (used for display,
//! statistics and filtering) and a typed `Vec<Record>` view (used for
//! encoding). The derived `Salary_Category` column is appended at load time.

use crate::bucket::SalaryBucket;
use crate::config::DatasetConfig;
use crate::error::{ProcessingError, Result, ResultExt};
use crate::schema::{Field, SALARY_COLUMN, required_columns};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// One row of the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub job_title: String,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub ai_adoption_level: String,
    pub automation_risk: String,
    pub required_skills: String,
    pub salary_usd: f64,
    pub remote_friendly: String,
    pub job_growth_projection: String,
}

impl Record {
    /// Value of a source field. Derived fields return `None`; use
    /// [`Record::salary_bucket`] for the salary category.
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::JobTitle => &self.job_title,
            Field::Industry => &self.industry,
            Field::CompanySize => &self.company_size,
            Field::Location => &self.location,
            Field::AiAdoptionLevel => &self.ai_adoption_level,
            Field::AutomationRisk => &self.automation_risk,
            Field::RequiredSkills => &self.required_skills,
            Field::RemoteFriendly => &self.remote_friendly,
            Field::JobGrowthProjection => &self.job_growth_projection,
            Field::SalaryCategory => return None,
        };
        Some(value.as_str())
    }

    pub fn salary_bucket(&self) -> SalaryBucket {
        SalaryBucket::classify(self.salary_usd)
    }
}

/// The loaded table. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct JobDataset {
    df: DataFrame,
    records: Vec<Record>,
    buckets: Vec<SalaryBucket>,
}

impl JobDataset {
    /// Load the table described by `config`.
    ///
    /// Any failure to read or parse the file is reported as
    /// [`ProcessingError::ArtifactLoad`]; a readable file without the fixed
    /// header set is [`ProcessingError::MissingColumns`].
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        let df = read_csv(config)?;
        info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            config.data_path.display()
        );
        Self::from_dataframe(df)
    }

    /// Load a comma-separated file with default settings.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = DatasetConfig {
            data_path: path.as_ref().to_path_buf(),
            ..DatasetConfig::default()
        };
        Self::load(&config)
    }

    /// Build the dataset from an already loaded frame.
    pub fn from_dataframe(mut df: DataFrame) -> Result<Self> {
        let missing: Vec<String> = required_columns()
            .into_iter()
            .filter(|name| df.column(name).is_err())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ProcessingError::MissingColumns(missing));
        }

        let mut columns = Vec::with_capacity(Field::SOURCE.len());
        for field in Field::SOURCE {
            columns.push(string_column(&df, field.column_name())?);
        }
        let salaries = float_column(&df, SALARY_COLUMN)?;

        let records: Vec<Record> = (0..df.height())
            .map(|row| {
                let value = |field: Field| columns[field.index()][row].clone();
                Record {
                    job_title: value(Field::JobTitle),
                    industry: value(Field::Industry),
                    company_size: value(Field::CompanySize),
                    location: value(Field::Location),
                    ai_adoption_level: value(Field::AiAdoptionLevel),
                    automation_risk: value(Field::AutomationRisk),
                    required_skills: value(Field::RequiredSkills),
                    salary_usd: salaries[row],
                    remote_friendly: value(Field::RemoteFriendly),
                    job_growth_projection: value(Field::JobGrowthProjection),
                }
            })
            .collect();

        let buckets: Vec<SalaryBucket> = records.iter().map(Record::salary_bucket).collect();
        let unclassified = buckets.iter().filter(|b| !b.is_classified()).count();
        if unclassified > 0 {
            warn!(
                "{} rows have a salary outside every bucket; their Salary_Category is null",
                unclassified
            );
        }

        let labels: Vec<Option<&str>> = buckets.iter().map(|b| b.label()).collect();
        df.with_column(Series::new(
            Field::SalaryCategory.column_name().into(),
            labels,
        ))
        .context("Appending Salary_Category")?;
        debug!("Derived Salary_Category for {} rows", records.len());

        Ok(Self {
            df,
            records,
            buckets,
        })
    }

    /// The table including the derived `Salary_Category` column.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Salary bucket of every row.
    pub fn salary_buckets(&self) -> &[SalaryBucket] {
        &self.buckets
    }

    pub fn salaries(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.salary_usd).collect()
    }

    /// Values of a categorical field, one per row.
    ///
    /// Only `Salary_Category` can yield `None` (unclassified salary).
    pub fn column_values(&self, field: Field) -> Vec<Option<&str>> {
        match field {
            Field::SalaryCategory => self.buckets.iter().map(|b| b.label()).collect(),
            source => self.records.iter().map(|r| r.get(source)).collect(),
        }
    }

    /// Distinct values of a field in first-seen order.
    pub fn unique_values(&self, field: Field) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.column_values(field)
            .into_iter()
            .flatten()
            .filter(|v| seen.insert(*v))
            .collect()
    }
}

fn read_csv(config: &DatasetConfig) -> Result<DataFrame> {
    let path = &config.data_path;
    let load_error = |reason: String| ProcessingError::ArtifactLoad {
        path: path.display().to_string(),
        reason,
    };

    if !path.exists() {
        return Err(load_error("file does not exist".to_string()));
    }

    CsvReadOptions::default()
        .with_infer_schema_length(Some(config.infer_schema_length))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(config.separator)
                .with_quote_char(Some(b'"')),
        )
        .try_into_reader_with_file_path(Some(path.clone()))
        .and_then(|reader| reader.finish())
        .map_err(|e| load_error(e.to_string()))
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(|v| v.trim().to_string())
                .ok_or_else(|| ProcessingError::NullValue {
                    column: name.to_string(),
                    row,
                })
        })
        .collect()
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| ProcessingError::NullValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_frame;

    #[test]
    fn test_from_dataframe_builds_records() {
        let dataset = JobDataset::from_dataframe(sample_frame()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[0].job_title, "Data Scientist");
        assert_eq!(dataset.records()[1].salary_usd, 45_000.0);
        assert_eq!(dataset.records()[2].get(Field::Location), Some("Tokyo"));
    }

    #[test]
    fn test_derived_salary_category() {
        let dataset = JobDataset::from_dataframe(sample_frame()).unwrap();
        assert_eq!(
            dataset.column_values(Field::SalaryCategory),
            vec![Some("Senior Level"), Some("Entry Level"), None]
        );
        let column = dataset.dataframe().column("Salary_Category").unwrap();
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn test_missing_columns_rejected() {
        let df = sample_frame().drop("Industry").unwrap();
        let err = JobDataset::from_dataframe(df).unwrap_err();
        assert!(matches!(err, ProcessingError::MissingColumns(ref cols) if cols == &["Industry"]));
    }

    #[test]
    fn test_null_categorical_rejected() {
        let mut df = sample_frame();
        df.with_column(Series::new(
            "Location".into(),
            &[Some("USA"), None, Some("Tokyo")],
        ))
        .unwrap();
        let err = JobDataset::from_dataframe(df).unwrap_err();
        assert!(matches!(err, ProcessingError::NullValue { ref column, row: 1 } if column == "Location"));
    }

    #[test]
    fn test_unique_values_first_seen_order() {
        let dataset = JobDataset::from_dataframe(sample_frame()).unwrap();
        assert_eq!(
            dataset.unique_values(Field::JobTitle),
            vec!["Data Scientist", "HR Manager"]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = JobDataset::from_csv_path("does/not/exist.csv").unwrap_err();
        assert_eq!(err.error_code(), "ARTIFACT_LOAD");
    }
}
