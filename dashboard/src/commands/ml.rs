//! Machine learning page and the `train` command.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::render::{TableView, key_values, percent, section};
use crate::state::{AppContext, DataContext};
use insight_learning::{
    ConfusionMatrix, ModelArtifact, ModelInfo, ModelRegistry, RankedFeature, Trainer,
    importance_frame,
};

/// Evaluation of one trained classifier.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub info: ModelInfo,
    pub label: &'static str,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub skipped_rows: usize,
    pub overfitting_risk: &'static str,
    pub feature_importance: Vec<RankedFeature>,
    pub confusion: ConfusionMatrix,
}

impl ModelSummary {
    pub fn from_artifact(artifact: &ModelArtifact) -> Self {
        let report = &artifact.report;
        Self {
            info: artifact.info(),
            label: artifact.target.label_field().column_name(),
            train_accuracy: report.train_accuracy,
            test_accuracy: report.test_accuracy,
            train_rows: report.train_rows,
            test_rows: report.test_rows,
            skipped_rows: report.skipped_rows,
            overfitting_risk: report.overfitting_risk(),
            feature_importance: report.feature_importance.clone(),
            confusion: report.confusion.clone(),
        }
    }

    pub fn render_text(&self) -> String {
        let stats = vec![
            ("Label".to_string(), self.label.to_string()),
            ("Artifact".to_string(), self.info.artifact.clone()),
            ("Trees".to_string(), self.info.n_trees.to_string()),
            (
                "Rows".to_string(),
                format!(
                    "{} train / {} test / {} skipped",
                    self.train_rows, self.test_rows, self.skipped_rows
                ),
            ),
            ("Train accuracy".to_string(), percent(self.train_accuracy)),
            ("Test accuracy".to_string(), percent(self.test_accuracy)),
            (
                "Overfitting risk".to_string(),
                self.overfitting_risk.to_string(),
            ),
            ("Trained at".to_string(), self.info.trained_at.clone()),
        ];
        let mut out = key_values(&stats);

        out.push_str("\nFeature importance\n");
        match importance_frame(&self.feature_importance) {
            Ok(frame) => out.push_str(&TableView::from_dataframe(&frame, None).render()),
            Err(err) => out.push_str(&format!("(unavailable: {err})\n")),
        }

        out.push_str("\nConfusion matrix (rows: actual, columns: predicted)\n");
        out.push_str(&confusion_table(&self.info.class_names, &self.confusion).render());
        out
    }
}

fn confusion_table(classes: &[String], confusion: &ConfusionMatrix) -> TableView {
    let mut headers = vec![""];
    headers.extend(classes.iter().map(String::as_str));
    let rows = classes
        .iter()
        .zip(&confusion.counts)
        .map(|(class, counts)| {
            std::iter::once(class.clone())
                .chain(counts.iter().map(|c| c.to_string()))
                .collect()
        })
        .collect();
    TableView::from_rows(&headers, rows)
}

fn render_models(models: &[ModelSummary]) -> String {
    models
        .iter()
        .map(|m| section(m.info.target.title(), &m.render_text()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineLearningResponse {
    pub models: Vec<ModelSummary>,
}

impl MachineLearningResponse {
    pub fn render_text(&self) -> String {
        render_models(&self.models)
    }
}

/// Evaluation of the three loaded classifiers.
pub fn machine_learning_page(ctx: &AppContext) -> MachineLearningResponse {
    MachineLearningResponse {
        models: ctx
            .registry()
            .artifacts()
            .map(ModelSummary::from_artifact)
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainResponse {
    pub models_dir: PathBuf,
    pub models: Vec<ModelSummary>,
}

impl TrainResponse {
    pub fn render_text(&self) -> String {
        format!(
            "Saved {} classifiers to {}\n\n{}",
            self.models.len(),
            self.models_dir.display(),
            render_models(&self.models)
        )
    }
}

/// Train all three classifiers on `data` and write them to `models_dir`.
///
/// The artifacts are verified against the encoder before anything is
/// written, so a failed run leaves the directory untouched.
pub fn train_models(
    data: &DataContext,
    trainer: &Trainer,
    models_dir: &Path,
) -> Result<(ModelRegistry, TrainResponse)> {
    let artifacts = trainer.train_all(&data.encoder, &data.table)?;
    let registry = ModelRegistry::from_artifacts(artifacts, &data.encoder)?;
    registry.save_dir(models_dir)?;
    info!(
        "Saved {} classifiers to {}",
        registry.artifacts().count(),
        models_dir.display()
    );

    let response = TrainResponse {
        models_dir: models_dir.to_path_buf(),
        models: registry
            .artifacts()
            .map(ModelSummary::from_artifact)
            .collect(),
    };
    Ok((registry, response))
}
