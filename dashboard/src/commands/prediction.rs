//! Prediction page.
//!
//! Every categorical input defaults to the first value seen in the table and
//! the salary defaults to 0. The three predictions are independent: an
//! unknown category or a bad salary fails only the targets that use it.

use serde::Serialize;

use crate::error::{DashboardError, ErrorPayload, Result};
use crate::page::DisplayFilters;
use crate::render::{TableView, key_values, percent, section};
use crate::state::AppContext;
use insight_learning::{LearningError, Prediction, Predictor};
use insight_processing::{
    Field, ProcessingError, RawInputs, Target, class_samples, samples_per_class,
};

/// Rows per class under "Show All Prediction Classes".
pub const ROWS_PER_CLASS: usize = 5;

/// Largest salary the input accepts.
pub const MAX_SALARY_INPUT: f64 = 5_000_000.0;

// ============================================================================
// TYPES
// ============================================================================

/// The values an input may take, with the pre-selected one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOptions {
    pub field: Field,
    pub description: &'static str,
    pub options: Vec<String>,
    pub default: Option<String>,
}

/// Result of one computation on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok { value: T },
    Error { error: ErrorPayload },
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok { value } => Some(value),
            Outcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Error { error } => Some(error),
        }
    }
}

impl<T> From<insight_learning::Result<T>> for Outcome<T> {
    fn from(result: insight_learning::Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Ok { value },
            Err(err) => Outcome::Error {
                error: ErrorPayload::from(&err),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPrediction {
    pub target: Target,
    pub title: &'static str,
    pub outcome: Outcome<Prediction>,
}

/// Rows listed under a heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleTable {
    pub heading: String,
    pub table: TableView,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub inputs: RawInputs,
    pub salary_category: Outcome<String>,
    pub predictions: Vec<TargetPrediction>,
    pub filters: DisplayFilters,
    pub dataset: Option<TableView>,
    pub class_samples: Vec<SampleTable>,
    pub selected_classes: Vec<SampleTable>,
}

impl PredictionResponse {
    pub fn render_text(&self) -> String {
        let mut inputs: Vec<(String, String)> = Field::SOURCE
            .iter()
            .map(|f| {
                (
                    f.column_name().to_string(),
                    self.inputs.get(*f).unwrap_or("-").to_string(),
                )
            })
            .collect();
        inputs.push((
            insight_processing::SALARY_COLUMN.to_string(),
            self.inputs
                .salary()
                .map_or_else(|| "-".to_string(), |s| format!("{s:.2}")),
        ));
        let mut out = section("Inputs", &key_values(&inputs));

        let mut results = vec![(
            "Salary category".to_string(),
            outcome_text(&self.salary_category, |label| label.clone()),
        )];
        results.extend(self.predictions.iter().map(|p| {
            (
                p.title.to_string(),
                outcome_text(&p.outcome, |prediction| {
                    format!(
                        "{} ({} confidence)",
                        prediction.label,
                        percent(prediction.confidence())
                    )
                }),
            )
        }));
        out.push('\n');
        out.push_str(&section("Predictions", &key_values(&results)));

        if let Some(dataset) = &self.dataset {
            out.push('\n');
            out.push_str(&section("Dataset", &dataset.render()));
        }
        for sample in self.class_samples.iter().chain(&self.selected_classes) {
            out.push('\n');
            out.push_str(&section(&sample.heading, &sample.table.render()));
        }
        out
    }
}

fn outcome_text<T>(outcome: &Outcome<T>, ok: impl Fn(&T) -> String) -> String {
    match outcome {
        Outcome::Ok { value } => ok(value),
        Outcome::Error { error } => format!("error [{}]: {}", error.code, error.message),
    }
}

/// Bucket label of the salary input.
fn bucket_label(salary: Option<f64>) -> insight_learning::Result<String> {
    let salary = salary.ok_or_else(|| {
        LearningError::from(ProcessingError::InvalidSalary(
            "salary was not supplied".to_string(),
        ))
    })?;
    let bucket = Predictor::bucket_salary(salary)?;
    Ok(bucket.label().unwrap_or_default().to_string())
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Options for every input field, in input order.
pub fn field_options(ctx: &AppContext) -> Vec<FieldOptions> {
    Field::SOURCE
        .iter()
        .map(|field| {
            let options: Vec<String> = ctx
                .dataset()
                .unique_values(*field)
                .into_iter()
                .map(str::to_string)
                .collect();
            FieldOptions {
                field: *field,
                description: field.description(),
                default: options.first().cloned(),
                options,
            }
        })
        .collect()
}

/// The pre-selected inputs: first seen value per field and a salary of 0.
pub fn default_inputs(ctx: &AppContext) -> RawInputs {
    field_options(ctx)
        .into_iter()
        .fold(RawInputs::new(), |inputs, options| match options.default {
            Some(value) => inputs.with(options.field, value),
            None => inputs,
        })
        .with_salary(0.0)
}

/// Fill fields missing from `inputs` with their defaults.
pub fn with_defaults(ctx: &AppContext, inputs: &RawInputs) -> RawInputs {
    let mut merged = default_inputs(ctx);
    for field in Field::SOURCE {
        if let Some(value) = inputs.get(field) {
            merged.set(field, value);
        }
    }
    match inputs.salary() {
        Some(salary) => merged.with_salary(salary),
        None => merged,
    }
}

/// Check a salary typed into the input, which accepts 0 to 5,000,000.
pub fn salary_input(salary: f64) -> Result<f64> {
    if salary.is_finite() && (0.0..=MAX_SALARY_INPUT).contains(&salary) {
        Ok(salary)
    } else {
        Err(DashboardError::InvalidSelection(format!(
            "salary {salary} must be between 0 and {MAX_SALARY_INPUT}"
        )))
    }
}

/// Predict all three targets and gather the tables the filters ask for.
pub fn prediction_page(
    ctx: &AppContext,
    inputs: RawInputs,
    filters: &DisplayFilters,
) -> Result<PredictionResponse> {
    let predictor = ctx.predictor();
    let salary_category: Outcome<String> = bucket_label(inputs.salary()).into();

    let predictions = predictor
        .predict_all(&inputs)
        .into_iter()
        .map(|(target, result)| TargetPrediction {
            target,
            title: target.title(),
            outcome: result.into(),
        })
        .collect();

    let dataset = filters
        .show_dataset
        .then(|| TableView::from_dataframe(ctx.dataset().dataframe(), None));

    let mut all_classes = Vec::new();
    if filters.show_all_classes {
        for target in Target::ALL {
            let field = target.label_field();
            for (label, rows) in samples_per_class(ctx.dataset(), field, ROWS_PER_CLASS)? {
                all_classes.push(SampleTable {
                    heading: format!("{}: {}", field.column_name(), label),
                    table: TableView::from_dataframe(&rows, None),
                });
            }
        }
    }

    let selected_classes = filters
        .selected()
        .into_iter()
        .map(|toggle| -> Result<SampleTable> {
            let rows = class_samples(ctx.dataset(), toggle.field(), &toggle.label, None)?;
            Ok(SampleTable {
                heading: toggle.heading(),
                table: TableView::from_dataframe(&rows, None),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PredictionResponse {
        inputs,
        salary_category,
        predictions,
        filters: filters.clone(),
        dataset,
        class_samples: all_classes,
        selected_classes,
    })
}
