//! Dataset page: where the table comes from and what it holds.

use serde::Serialize;

use crate::error::Result;
use crate::render::{TableView, key_values, section};
use crate::state::AppContext;
use insight_processing::{ColumnInfo, DatasetOverview, DatasetProfiler, NumericSummary};

pub const DATASET_SOURCE: &str =
    "https://www.kaggle.com/datasets/uom190346a/ai-powered-job-market-insights";

const DATASET_DESCRIPTION: &str = "The AI-Powered Job Market Insights dataset, introduced by \
Laksika Tharmalingam, is a synthetic snapshot of the modern job market. It covers job titles, \
industries, company sizes, locations, AI adoption, automation risk, required skills, salaries, \
remote work and projected job growth across 500 job listings.";

/// Rows shown in the preview table.
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct DatasetResponse {
    pub description: &'static str,
    pub source: &'static str,
    pub overview: DatasetOverview,
    pub statistics: Vec<NumericSummary>,
    pub preview: TableView,
}

impl DatasetResponse {
    pub fn render_text(&self) -> String {
        let mut out = section(
            "Dataset",
            &format!("{}\n\nSource: {}\n", self.description, self.source),
        );

        let shape = vec![
            ("Rows".to_string(), self.overview.rows.to_string()),
            ("Columns".to_string(), self.overview.columns.to_string()),
        ];
        out.push('\n');
        out.push_str(&section("Shape", &key_values(&shape)));

        out.push('\n');
        out.push_str(&section("Columns", &columns_table(&self.overview.column_info).render()));

        out.push('\n');
        out.push_str(&section("Statistics", &statistics_table(&self.statistics).render()));

        out.push('\n');
        out.push_str(&section("Preview", &self.preview.render()));
        out
    }
}

fn columns_table(columns: &[ColumnInfo]) -> TableView {
    let rows = columns
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.dtype.clone(),
                c.null_count.to_string(),
                c.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    TableView::from_rows(&["Column", "Type", "Nulls", "Description"], rows)
}

fn statistics_table(stats: &[NumericSummary]) -> TableView {
    let rows = stats
        .iter()
        .map(|s| {
            let mut row = vec![s.column.clone(), s.count.to_string()];
            row.extend(
                [s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max]
                    .iter()
                    .map(|v| format!("{v:.2}")),
            );
            row
        })
        .collect();
    TableView::from_rows(
        &["Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"],
        rows,
    )
}

/// Description, shape, column documentation, numeric summary and the first rows.
pub fn dataset_page(ctx: &AppContext) -> Result<DatasetResponse> {
    let dataset = ctx.dataset();
    Ok(DatasetResponse {
        description: DATASET_DESCRIPTION,
        source: DATASET_SOURCE,
        overview: DatasetProfiler::overview(dataset),
        statistics: DatasetProfiler::describe(dataset)?,
        preview: TableView::from_dataframe(dataset.dataframe(), Some(PREVIEW_ROWS)),
    })
}
