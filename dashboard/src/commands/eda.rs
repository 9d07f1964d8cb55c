//! Exploratory data analysis page.

use serde::Serialize;

use crate::error::Result;
use crate::render::{TableView, percent, section};
use crate::state::AppContext;
use insight_processing::{ClassDistribution, Field, class_distribution};

/// Width of the longest bar in the text chart.
const BAR_WIDTH: usize = 20;

/// The columns the page charts, one per target.
pub const EDA_FIELDS: [Field; 3] = [
    Field::SalaryCategory,
    Field::AutomationRisk,
    Field::JobGrowthProjection,
];

#[derive(Debug, Clone, Serialize)]
pub struct EdaResponse {
    pub rows: usize,
    pub distributions: Vec<ClassDistribution>,
}

impl EdaResponse {
    pub fn render_text(&self) -> String {
        self.distributions
            .iter()
            .map(|dist| section(&format!("Distribution of {}", dist.field), &chart(dist)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Counts per class followed by a horizontal bar.
fn chart(dist: &ClassDistribution) -> String {
    let max = dist.classes.iter().map(|c| c.count).max().unwrap_or(0);
    let rows = dist
        .classes
        .iter()
        .map(|c| {
            let len = if max == 0 { 0 } else { c.count * BAR_WIDTH / max };
            vec![
                c.label.clone(),
                c.count.to_string(),
                percent(c.percentage / 100.0),
                "#".repeat(len),
            ]
        })
        .collect();
    TableView::from_rows(&["Class", "Count", "Share", ""], rows).render()
}

pub fn eda_page(ctx: &AppContext) -> Result<EdaResponse> {
    let dataset = ctx.dataset();
    let distributions = EDA_FIELDS
        .iter()
        .map(|field| class_distribution(dataset, *field))
        .collect::<insight_processing::Result<Vec<_>>>()?;
    Ok(EdaResponse {
        rows: dataset.len(),
        distributions,
    })
}
