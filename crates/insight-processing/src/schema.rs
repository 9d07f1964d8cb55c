//! Fixed column schema of the job market table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the single numeric column.
pub const SALARY_COLUMN: &str = "Salary_USD";

/// Description of the numeric salary column.
pub const SALARY_DESCRIPTION: &str = "The job offers an annual pay in USD.";

/// A categorical field of a job record.
///
/// Variant order is the order of the encoded columns in the feature table.
/// [`Field::SalaryCategory`] is derived from `Salary_USD` rather than read
/// from the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    JobTitle,
    Industry,
    CompanySize,
    Location,
    AiAdoptionLevel,
    AutomationRisk,
    RequiredSkills,
    RemoteFriendly,
    JobGrowthProjection,
    SalaryCategory,
}

impl Field {
    /// Every categorical field, in encoded-column order.
    pub const ALL: [Field; 10] = [
        Field::JobTitle,
        Field::Industry,
        Field::CompanySize,
        Field::Location,
        Field::AiAdoptionLevel,
        Field::AutomationRisk,
        Field::RequiredSkills,
        Field::RemoteFriendly,
        Field::JobGrowthProjection,
        Field::SalaryCategory,
    ];

    /// Categorical fields read directly from the source table.
    pub const SOURCE: [Field; 9] = [
        Field::JobTitle,
        Field::Industry,
        Field::CompanySize,
        Field::Location,
        Field::AiAdoptionLevel,
        Field::AutomationRisk,
        Field::RequiredSkills,
        Field::RemoteFriendly,
        Field::JobGrowthProjection,
    ];

    /// Column header in the source table.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::JobTitle => "Job_Title",
            Field::Industry => "Industry",
            Field::CompanySize => "Company_Size",
            Field::Location => "Location",
            Field::AiAdoptionLevel => "AI_Adoption_Level",
            Field::AutomationRisk => "Automation_Risk",
            Field::RequiredSkills => "Required_Skills",
            Field::RemoteFriendly => "Remote_Friendly",
            Field::JobGrowthProjection => "Job_Growth_Projection",
            Field::SalaryCategory => "Salary_Category",
        }
    }

    /// Column name in the encoded feature table.
    pub fn encoded_name(self) -> &'static str {
        match self {
            Field::JobTitle => "Job_encoded",
            Field::Industry => "Industry_encoded",
            Field::CompanySize => "Size_encoded",
            Field::Location => "Location_encoded",
            Field::AiAdoptionLevel => "AI_Adoption_encoded",
            Field::AutomationRisk => "Automation_encoded",
            Field::RequiredSkills => "Skills_encoded",
            Field::RemoteFriendly => "Remote_encoded",
            Field::JobGrowthProjection => "Growth_encoded",
            Field::SalaryCategory => "Salary_encoded",
        }
    }

    /// Human-readable description shown on the dataset page.
    pub fn description(self) -> &'static str {
        match self {
            Field::JobTitle => "The title of the job position.",
            Field::Industry => "The type of industry that is hiring.",
            Field::CompanySize => "The company size of the job.",
            Field::Location => "The location of the job.",
            Field::AiAdoptionLevel => {
                "The level to which the company has integrated AI into its operations."
            }
            Field::AutomationRisk => {
                "The probability that the job will be automated during the next years."
            }
            Field::RequiredSkills => "The primary skills required for the job role.",
            Field::RemoteFriendly => "Determines whether the job may be completed remotely.",
            Field::JobGrowthProjection => {
                "The expected growth or drop in the job position over the following five years."
            }
            Field::SalaryCategory => "Salary bucket derived from Salary_USD.",
        }
    }

    /// Whether the field is computed rather than read from the table.
    pub fn is_derived(self) -> bool {
        matches!(self, Field::SalaryCategory)
    }

    /// Position of the field in [`Field::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a field by its source column header.
    pub fn from_column_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFieldError(String);

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for ParseFieldError {}

impl FromStr for Field {
    type Err = ParseFieldError;

    /// Accepts either the column header (`Job_Title`) or a kebab-case alias
    /// (`job-title`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(field) = Field::from_column_name(s) {
            return Ok(field);
        }
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Field::ALL
            .into_iter()
            .find(|f| f.column_name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| ParseFieldError(s.to_string()))
    }
}

/// Headers every input table must carry.
pub fn required_columns() -> Vec<&'static str> {
    Field::SOURCE
        .iter()
        .map(|f| f.column_name())
        .chain(std::iter::once(SALARY_COLUMN))
        .collect()
}
