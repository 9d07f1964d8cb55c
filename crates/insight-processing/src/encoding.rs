//! Label encoding of categorical fields.
//!
//! Each field gets a [`CategoryMapping`]: a bijection between its distinct
//! values and `0..k`, assigned in sorted order. Mappings are fit once from
//! the full table and are immutable afterwards.

use crate::dataset::JobDataset;
use crate::error::{ProcessingError, Result};
use crate::schema::{Field, SALARY_COLUMN};
use crate::types::{EncodingPair, EncodingPreview};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Sorted value list of one categorical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MappingParams", into = "MappingParams")]
pub struct CategoryMapping {
    field: Field,
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

/// Serialized form of a [`CategoryMapping`]; the lookup index is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MappingParams {
    field: Field,
    classes: Vec<String>,
}

impl TryFrom<MappingParams> for CategoryMapping {
    type Error = ProcessingError;

    fn try_from(params: MappingParams) -> Result<Self> {
        if params.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ProcessingError::InvalidConfig(format!(
                "classes of '{}' must be sorted and distinct",
                params.field
            )));
        }
        Ok(Self::from_sorted(params.field, params.classes))
    }
}

impl From<CategoryMapping> for MappingParams {
    fn from(mapping: CategoryMapping) -> Self {
        Self {
            field: mapping.field,
            classes: mapping.classes,
        }
    }
}

impl CategoryMapping {
    /// Fit a mapping over the observed values of `field`.
    pub fn fit<'a>(field: Field, values: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        if distinct.is_empty() {
            return Err(ProcessingError::NoValidValues(field.column_name().to_string()));
        }
        let classes = distinct.into_iter().map(str::to_string).collect();
        Ok(Self::from_sorted(field, classes))
    }

    fn from_sorted(field: Field, classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(code, value)| (value.clone(), code as u32))
            .collect();
        Self {
            field,
            classes,
            index,
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Code of a raw value. Unseen values are an error, never a default code.
    pub fn encode(&self, value: &str) -> Result<u32> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| ProcessingError::UnknownCategory {
                field: self.field.column_name().to_string(),
                value: value.to_string(),
            })
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Values in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index.contains_key(value)
    }
}

/// One mapping per categorical field, including the derived salary category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingLayer {
    mappings: Vec<CategoryMapping>,
}

impl EncodingLayer {
    /// Fit every field of `dataset`.
    ///
    /// `Salary_Category` is fit over classified rows only.
    pub fn fit(dataset: &JobDataset) -> Result<Self> {
        let mut mappings = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let values = dataset.column_values(field);
            let mapping = CategoryMapping::fit(field, values.into_iter().flatten())?;
            debug!("Fitted {} with {} classes", field, mapping.len());
            mappings.push(mapping);
        }
        Ok(Self { mappings })
    }

    pub fn mapping(&self, field: Field) -> &CategoryMapping {
        &self.mappings[field.index()]
    }

    pub fn mappings(&self) -> &[CategoryMapping] {
        &self.mappings
    }

    pub fn encode(&self, field: Field, value: &str) -> Result<u32> {
        self.mapping(field).encode(value)
    }

    pub fn decode(&self, field: Field, code: u32) -> Option<&str> {
        self.mapping(field).decode(code)
    }

    /// Encode every row of `dataset`.
    pub fn transform(&self, dataset: &JobDataset) -> Result<EncodedTable> {
        let mut columns = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let mapping = self.mapping(field);
            let codes = dataset
                .column_values(field)
                .into_iter()
                .map(|value| value.map(|v| mapping.encode(v)).transpose())
                .collect::<Result<Vec<_>>>()?;
            columns.push(codes);
        }
        Ok(EncodedTable {
            columns,
            salary_usd: dataset.salaries(),
        })
    }

    /// The value/code table of one field.
    pub fn preview(&self, field: Field) -> EncodingPreview {
        let mapping = self.mapping(field);
        EncodingPreview {
            column: field.column_name().to_string(),
            encoded_column: field.encoded_name().to_string(),
            pairs: mapping
                .classes()
                .iter()
                .enumerate()
                .map(|(code, value)| EncodingPair {
                    original: value.clone(),
                    encoded: code as u32,
                })
                .collect(),
        }
    }
}

/// The numeric feature table: one code column per field plus `Salary_USD`.
///
/// A code is `None` only in the `Salary_Category` column, for rows whose
/// salary is unclassified.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTable {
    columns: Vec<Vec<Option<u32>>>,
    salary_usd: Vec<f64>,
}

impl EncodedTable {
    pub fn column(&self, field: Field) -> &[Option<u32>] {
        &self.columns[field.index()]
    }

    pub fn salaries(&self) -> &[f64] {
        &self.salary_usd
    }

    pub fn len(&self) -> usize {
        self.salary_usd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.salary_usd.is_empty()
    }

    /// Export as a polars frame with the encoded column names.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Field::ALL
            .iter()
            .map(|field| {
                Series::new(field.encoded_name().into(), self.column(*field).to_vec()).into()
            })
            .collect();
        columns.push(Series::new(SALARY_COLUMN.into(), self.salary_usd.clone()).into());
        Ok(DataFrame::new(columns)?)
    }
}
