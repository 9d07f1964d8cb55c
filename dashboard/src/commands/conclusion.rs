//! Conclusion page, summarized from the data and the loaded models.

use serde::Serialize;

use crate::error::Result;
use crate::render::{key_values, percent, section};
use crate::state::AppContext;
use insight_processing::{Target, class_distribution};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetInsight {
    pub target: Target,
    pub title: &'static str,
    pub majority_class: Option<String>,
    /// Share of the majority class, 0 to 1.
    pub majority_share: f64,
    pub test_accuracy: f64,
    pub overfitting_risk: &'static str,
    pub top_feature: Option<String>,
}

impl TargetInsight {
    /// Accuracy over always guessing the majority class.
    pub fn lift(&self) -> f64 {
        self.test_accuracy - self.majority_share
    }

    fn summary(&self) -> String {
        let majority = self.majority_class.as_deref().unwrap_or("-");
        let top = self.top_feature.as_deref().unwrap_or("-");
        format!(
            "most common class {majority} ({}); test accuracy {} ({:+.1} points over the majority class); most important feature {top}; overfitting risk {}",
            percent(self.majority_share),
            percent(self.test_accuracy),
            self.lift() * 100.0,
            self.overfitting_risk,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConclusionResponse {
    pub rows: usize,
    pub insights: Vec<TargetInsight>,
}

impl ConclusionResponse {
    pub fn render_text(&self) -> String {
        let lines: Vec<(String, String)> = self
            .insights
            .iter()
            .map(|i| (i.title.to_string(), i.summary()))
            .collect();
        section(
            "Conclusion",
            &format!(
                "Findings over {} job listings:\n\n{}",
                self.rows,
                key_values(&lines)
            ),
        )
    }
}

pub fn conclusion_page(ctx: &AppContext) -> Result<ConclusionResponse> {
    let insights = Target::ALL
        .iter()
        .map(|target| -> Result<TargetInsight> {
            let artifact = ctx.registry().artifact(*target)?;
            let dist = class_distribution(ctx.dataset(), target.label_field())?;
            let majority = dist.classes.first();
            Ok(TargetInsight {
                target: *target,
                title: target.title(),
                majority_class: majority.map(|c| c.label.clone()),
                majority_share: majority.map_or(0.0, |c| c.percentage / 100.0),
                test_accuracy: artifact.report.test_accuracy,
                overfitting_risk: artifact.report.overfitting_risk(),
                top_feature: artifact
                    .report
                    .feature_importance
                    .first()
                    .map(|f| f.name.clone()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ConclusionResponse {
        rows: ctx.dataset().len(),
        insights,
    })
}
