use serde::{Deserialize, Serialize};

/// Shape and per-column metadata of the loaded table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub column_info: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Descriptive statistics of one numeric column.
///
/// Quartiles use linear interpolation between closest ranks and `std` is the
/// sample standard deviation (`n - 1` denominator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// A count attached to a column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCount {
    pub column: String,
    pub count: usize,
}

impl ColumnCount {
    pub fn new(column: impl Into<String>, count: usize) -> Self {
        Self {
            column: column.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueValues {
    pub column: String,
    /// Distinct non-null values in first-seen order.
    pub values: Vec<String>,
}

/// Null, duplicate and cardinality checks over the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    pub null_counts: Vec<ColumnCount>,
    pub duplicate_rows: usize,
    pub duplicate_percentage: f64,
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub unique_counts: Vec<ColumnCount>,
    pub unique_values: Vec<UniqueValues>,
}

impl CleaningReport {
    /// Total number of null cells across every column.
    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|c| c.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassCount {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Value counts of one categorical field, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDistribution {
    pub field: String,
    pub total: usize,
    pub classes: Vec<ClassCount>,
}

impl ClassDistribution {
    pub fn count_of(&self, label: &str) -> Option<usize> {
        self.classes
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingPair {
    pub original: String,
    pub encoded: u32,
}

/// The mapping table of one field as shown on the cleaning page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingPreview {
    pub column: String,
    pub encoded_column: String,
    pub pairs: Vec<EncodingPair>,
}
