//! Prediction targets and their ordered feature sets.

use crate::dataset::Record;
use crate::encoding::{EncodedTable, EncodingLayer};
use crate::error::{ProcessingError, Result, ResultExt};
use crate::schema::{Field, SALARY_COLUMN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One column of a feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Categorical(Field),
    SalaryUsd,
}

impl Feature {
    /// Column name in the encoded table.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Categorical(field) => field.encoded_name(),
            Feature::SalaryUsd => SALARY_COLUMN,
        }
    }
}

use Feature::{Categorical as C, SalaryUsd};

const AUTOMATION_FEATURES: [Feature; 9] = [
    C(Field::JobTitle),
    C(Field::Industry),
    C(Field::CompanySize),
    C(Field::Location),
    C(Field::AiAdoptionLevel),
    C(Field::RequiredSkills),
    C(Field::RemoteFriendly),
    SalaryUsd,
    C(Field::JobGrowthProjection),
];

const GROWTH_FEATURES: [Feature; 9] = [
    C(Field::JobTitle),
    C(Field::Industry),
    C(Field::CompanySize),
    C(Field::Location),
    C(Field::AiAdoptionLevel),
    C(Field::RequiredSkills),
    C(Field::RemoteFriendly),
    SalaryUsd,
    C(Field::AutomationRisk),
];

const SALARY_FEATURES: [Feature; 9] = [
    C(Field::JobTitle),
    C(Field::Industry),
    C(Field::CompanySize),
    C(Field::Location),
    C(Field::AiAdoptionLevel),
    C(Field::RequiredSkills),
    C(Field::RemoteFriendly),
    C(Field::AutomationRisk),
    C(Field::JobGrowthProjection),
];

/// Ordered list of features a classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    features: &'static [Feature],
}

impl FeatureSet {
    pub const AUTOMATION: FeatureSet = FeatureSet {
        features: &AUTOMATION_FEATURES,
    };
    pub const GROWTH: FeatureSet = FeatureSet {
        features: &GROWTH_FEATURES,
    };
    pub const SALARY: FeatureSet = FeatureSet {
        features: &SALARY_FEATURES,
    };

    pub fn features(&self) -> &'static [Feature] {
        self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    pub fn uses_salary(&self) -> bool {
        self.features.contains(&Feature::SalaryUsd)
    }

    /// Encode raw inputs into a vector in this set's order.
    ///
    /// Fails with [`ProcessingError::MissingInput`] when a categorical input
    /// is absent, [`ProcessingError::UnknownCategory`] when it is unseen, and
    /// [`ProcessingError::InvalidSalary`] when a required salary is missing,
    /// non-finite or negative.
    pub fn assemble(&self, encoder: &EncodingLayer, inputs: &RawInputs) -> Result<Vec<f64>> {
        self.features
            .iter()
            .map(|feature| match feature {
                Feature::Categorical(field) => {
                    let value = inputs
                        .get(*field)
                        .ok_or_else(|| ProcessingError::MissingInput(field.to_string()))?;
                    encoder.encode(*field, value).map(f64::from)
                }
                Feature::SalaryUsd => inputs.validated_salary(),
            })
            .collect()
    }

    /// Feature vector of one row of the encoded table, or `None` if any of
    /// its codes is missing.
    pub fn row(&self, table: &EncodedTable, row: usize) -> Option<Vec<f64>> {
        self.features
            .iter()
            .map(|feature| match feature {
                Feature::Categorical(field) => table.column(*field)[row].map(f64::from),
                Feature::SalaryUsd => Some(table.salaries()[row]),
            })
            .collect()
    }

    /// Design matrix and labels for training against `label`.
    ///
    /// Rows with a missing feature code or a missing label are skipped.
    pub fn training_matrix(&self, table: &EncodedTable, label: Field) -> TrainingMatrix {
        let labels = table.column(label);
        let mut matrix = TrainingMatrix::default();
        for (row, code) in labels.iter().enumerate() {
            let (Some(code), Some(features)) = (code, self.row(table, row)) else {
                continue;
            };
            matrix.x.push(features);
            matrix.y.push(*code as usize);
            matrix.rows.push(row);
        }
        matrix
    }
}

/// Rows selected for training.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingMatrix {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<usize>,
    /// Source row index of each sample.
    pub rows: Vec<usize>,
}

impl TrainingMatrix {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// A classification target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Automation,
    Growth,
    Salary,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Automation, Target::Growth, Target::Salary];

    /// The categorical field this target predicts.
    pub fn label_field(self) -> Field {
        match self {
            Target::Automation => Field::AutomationRisk,
            Target::Growth => Field::JobGrowthProjection,
            Target::Salary => Field::SalaryCategory,
        }
    }

    pub fn feature_set(self) -> FeatureSet {
        match self {
            Target::Automation => FeatureSet::AUTOMATION,
            Target::Growth => FeatureSet::GROWTH,
            Target::Salary => FeatureSet::SALARY,
        }
    }

    /// File stem of the persisted classifier.
    pub fn artifact_stem(self) -> &'static str {
        match self {
            Target::Automation => "RFC_Automation",
            Target::Growth => "RFC_GrowthPrediction",
            Target::Salary => "RFC_Salary",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Automation => "automation",
            Target::Growth => "growth",
            Target::Salary => "salary",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Target::Automation => "Automation Risk",
            Target::Growth => "Job Growth Projection",
            Target::Salary => "Salary Category",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automation" | "automation_risk" | "automation-risk" => Ok(Target::Automation),
            "growth" | "job_growth" | "job-growth" => Ok(Target::Growth),
            "salary" | "salary_category" | "salary-category" => Ok(Target::Salary),
            _ => Err(ProcessingError::InvalidConfig(format!("unknown target '{s}'"))),
        }
    }
}

/// Raw, unencoded inputs for one prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    values: BTreeMap<Field, String>,
    salary_usd: Option<f64>,
}

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every source field and the salary of an existing record.
    pub fn from_record(record: &Record) -> Self {
        let values = Field::SOURCE
            .into_iter()
            .filter_map(|field| record.get(field).map(|v| (field, v.to_string())))
            .collect();
        Self {
            values,
            salary_usd: Some(record.salary_usd),
        }
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn with_salary(mut self, salary: f64) -> Self {
        self.salary_usd = Some(salary);
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn salary(&self) -> Option<f64> {
        self.salary_usd
    }

    fn validated_salary(&self) -> Result<f64> {
        match self.salary_usd {
            None => Err(ProcessingError::InvalidSalary("salary was not supplied".to_string())),
            Some(s) if !s.is_finite() => Err(ProcessingError::InvalidSalary(format!(
                "{s} is not a finite number"
            ))),
            Some(s) if s < 0.0 => Err(ProcessingError::InvalidSalary(format!(
                "{s} is negative"
            ))),
            Some(s) => Ok(s),
        }
    }
}

/// Encode `inputs` for `target`, tagging errors with the target name.
pub fn encode_for(target: Target, encoder: &EncodingLayer, inputs: &RawInputs) -> Result<Vec<f64>> {
    target
        .feature_set()
        .assemble(encoder, inputs)
        .context(format!("Encoding inputs for {target}"))
}
