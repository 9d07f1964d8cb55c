//! Data cleaning and pre-processing page.
//!
//! Shows the cleaning checks, the label encoding of every categorical column
//! and how each target's rows are divided between training and testing.

use polars::prelude::{DataFrame, IdxCa, IdxSize, PolarsResult};
use serde::Serialize;

use crate::error::Result;
use crate::render::{TableView, key_values, section};
use crate::state::AppContext;
use insight_learning::{TrainingConfig, train_test_split};
use insight_processing::{
    CleaningReport, DatasetProfiler, EncodingPreview, Field, ProcessingError, Target,
};

/// Rows shown from each split partition.
pub const PARTITION_PREVIEW_ROWS: usize = 5;

/// First rows of the feature and label partitions of one split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitPreview {
    pub x_train: TableView,
    pub x_test: TableView,
    pub y_train: TableView,
    pub y_test: TableView,
}

impl SplitPreview {
    fn render_text(&self) -> String {
        [
            ("X_train", &self.x_train),
            ("X_test", &self.x_test),
            ("Y_train", &self.y_train),
            ("Y_test", &self.y_test),
        ]
        .iter()
        .map(|(name, table)| format!("{name}\n{}", table.render()))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/// Row counts and partition heads of one target's train/test split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitSummary {
    pub target: Target,
    pub features: Vec<&'static str>,
    pub label: &'static str,
    pub test_size: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub skipped_rows: usize,
    pub preview: SplitPreview,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleaningResponse {
    pub report: CleaningReport,
    pub encodings: Vec<EncodingPreview>,
    pub splits: Vec<SplitSummary>,
}

impl CleaningResponse {
    pub fn render_text(&self) -> String {
        let report = &self.report;
        let checks = vec![
            ("Null values".to_string(), report.total_nulls().to_string()),
            (
                "Duplicate rows".to_string(),
                format!(
                    "{} ({:.2}%)",
                    report.duplicate_rows, report.duplicate_percentage
                ),
            ),
            (
                "Categorical columns".to_string(),
                report.categorical_columns.join(", "),
            ),
            (
                "Numeric columns".to_string(),
                report.numeric_columns.join(", "),
            ),
        ];
        let mut out = section("Cleaning Checks", &key_values(&checks));

        let uniques = report
            .unique_counts
            .iter()
            .map(|c| vec![c.column.clone(), c.count.to_string()])
            .collect();
        out.push('\n');
        out.push_str(&section(
            "Unique Values",
            &TableView::from_rows(&["Column", "Unique"], uniques).render(),
        ));

        for preview in &self.encodings {
            let rows = preview
                .pairs
                .iter()
                .map(|p| vec![p.original.clone(), p.encoded.to_string()])
                .collect();
            let headers = [preview.column.as_str(), preview.encoded_column.as_str()];
            out.push('\n');
            out.push_str(&section(
                &format!("Label Encoding: {}", preview.column),
                &TableView::from_rows(&headers, rows).render(),
            ));
        }

        let splits = self
            .splits
            .iter()
            .map(|s| {
                vec![
                    s.target.title().to_string(),
                    s.label.to_string(),
                    format!("{:.2}", s.test_size),
                    s.train_rows.to_string(),
                    s.test_rows.to_string(),
                    s.skipped_rows.to_string(),
                ]
            })
            .collect();
        out.push('\n');
        out.push_str(&section(
            "Train/Test Splits",
            &TableView::from_rows(
                &["Model", "Label", "Test size", "Train", "Test", "Skipped"],
                splits,
            )
            .render(),
        ));

        for split in &self.splits {
            out.push('\n');
            out.push_str(&section(
                &format!("{} Split Preview", split.target.title()),
                &split.preview.render_text(),
            ));
        }
        out
    }
}

/// Encoded `columns` of the source rows in `rows`, in that order.
fn partition_view(encoded: &DataFrame, columns: &[&str], rows: &[usize]) -> Result<TableView> {
    let frame = select_rows(encoded, columns, rows).map_err(ProcessingError::from)?;
    Ok(TableView::from_dataframe(&frame, Some(PARTITION_PREVIEW_ROWS)))
}

fn select_rows(encoded: &DataFrame, columns: &[&str], rows: &[usize]) -> PolarsResult<DataFrame> {
    let indices: Vec<IdxSize> = rows.iter().map(|&row| row as IdxSize).collect();
    encoded
        .select(columns.iter().copied())?
        .take(&IdxCa::from_vec("row".into(), indices))
}

/// The split the trainer would use for `target` under `config`.
pub fn split_summary(
    ctx: &AppContext,
    target: Target,
    config: &TrainingConfig,
) -> Result<SplitSummary> {
    let feature_set = target.feature_set();
    let matrix = feature_set.training_matrix(&ctx.data().table, target.label_field());
    let test_size = config.test_size(target);
    let split = train_test_split(matrix.len(), test_size, config.split_seed)?;

    // Split indices address the training matrix; map them back to table rows.
    let source_rows = |samples: &[usize]| -> Vec<usize> {
        samples.iter().map(|&sample| matrix.rows[sample]).collect()
    };
    let train_source = source_rows(&split.train);
    let test_source = source_rows(&split.test);

    let encoded = ctx.data().table.to_dataframe()?;
    let features = feature_set.names();
    let label = [target.label_field().encoded_name()];
    let preview = SplitPreview {
        x_train: partition_view(&encoded, &features, &train_source)?,
        x_test: partition_view(&encoded, &features, &test_source)?,
        y_train: partition_view(&encoded, &label, &train_source)?,
        y_test: partition_view(&encoded, &label, &test_source)?,
    };

    Ok(SplitSummary {
        target,
        features,
        label: target.label_field().column_name(),
        test_size,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        skipped_rows: ctx.data().table.len() - matrix.len(),
        preview,
    })
}

pub fn cleaning_page(ctx: &AppContext) -> Result<CleaningResponse> {
    let report = DatasetProfiler::cleaning_report(ctx.dataset())?;
    let encodings = Field::ALL
        .iter()
        .map(|field| ctx.encoder().preview(*field))
        .collect();
    let config = TrainingConfig::default();
    let splits = Target::ALL
        .iter()
        .map(|target| split_summary(ctx, *target, &config))
        .collect::<Result<Vec<_>>>()?;
    Ok(CleaningResponse {
        report,
        encodings,
        splits,
    })
}
