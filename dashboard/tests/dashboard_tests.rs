//! End-to-end tests of the dashboard pages over a trained fixture.

use insight_learning::{ForestConfig, Trainer, TrainingConfig};
use insight_processing::{Field, Target};
use job_insight_lib::commands::{
    self, Outcome, PARTITION_PREVIEW_ROWS, PageResponse, default_inputs, field_options,
    prediction_page, salary_input, with_defaults,
};
use job_insight_lib::{
    AppConfig, AppContext, ClassToggle, DataContext, DisplayFilters, Navigation, Page,
    render_page,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn trainer() -> Trainer {
    let forest = ForestConfig::builder()
        .n_trees(10)
        .build()
        .expect("valid forest config");
    let config = TrainingConfig::builder()
        .forest(forest)
        .build()
        .expect("valid training config");
    Trainer::builder().config(config).build().expect("valid trainer")
}

/// Train into a temporary model directory and load the full context from it.
fn trained_context() -> (TempDir, AppContext) {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::default()
        .with_data_path(fixtures_path().join("jobs_sample.csv"))
        .with_models_dir(dir.path().join("models"));

    let data = DataContext::load(&config).expect("Failed to load fixture");
    commands::train_models(&data, &trainer(), &config.models_dir).expect("Training failed");

    let ctx = AppContext::load(config).expect("Failed to load context");
    (dir, ctx)
}

fn prediction_nav(filters: DisplayFilters) -> Navigation {
    let mut nav = Navigation::new(Page::Prediction);
    assert!(nav.set_filters(filters));
    nav
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_missing_models_are_fatal() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::default()
        .with_data_path(fixtures_path().join("jobs_sample.csv"))
        .with_models_dir(dir.path());

    let err = AppContext::load(config).unwrap_err();
    assert_eq!(err.error_code(), "ARTIFACT_LOAD");
    assert!(!err.is_recoverable());
}

#[test]
fn test_train_writes_every_artifact() {
    let (dir, ctx) = trained_context();
    let models = dir.path().join("models");
    for name in [
        "RFC_Automation.json",
        "RFC_GrowthPrediction.json",
        "RFC_Salary.json",
    ] {
        assert!(models.join(name).exists(), "{name} was not written");
    }
    assert_eq!(ctx.registry().infos().len(), 3);
}

// ============================================================================
// Pages
// ============================================================================

#[test]
fn test_dataset_page() {
    let (_dir, ctx) = trained_context();
    let response = commands::dataset_page(&ctx).unwrap();

    assert_eq!(response.overview.rows, 42);
    assert_eq!(response.preview.rows.len(), 10);
    assert_eq!(response.preview.total_rows, 42);
    assert_eq!(response.preview.rows[0][0], "Data Scientist");
    assert!(response.statistics.iter().any(|s| s.column == "Salary_USD"));
    assert!(response.render_text().contains("kaggle.com"));
}

#[test]
fn test_eda_page_distributions() {
    let (_dir, ctx) = trained_context();
    let response = commands::eda_page(&ctx).unwrap();

    let fields: Vec<&str> = response
        .distributions
        .iter()
        .map(|d| d.field.as_str())
        .collect();
    assert_eq!(
        fields,
        vec!["Salary_Category", "Automation_Risk", "Job_Growth_Projection"]
    );

    // The unclassified salary is not counted.
    assert_eq!(response.distributions[0].total, 41);

    let growth = &response.distributions[2];
    assert_eq!(growth.classes[0].label, "Growth");
    assert_eq!(growth.count_of("Growth"), Some(17));
    assert_eq!(growth.count_of("Stable"), Some(12));
    let total: f64 = growth.classes.iter().map(|c| c.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn test_cleaning_page_splits() {
    let (_dir, ctx) = trained_context();
    let response = commands::cleaning_page(&ctx).unwrap();

    assert_eq!(response.encodings.len(), 10);
    let risk = response
        .encodings
        .iter()
        .find(|e| e.column == "Automation_Risk")
        .unwrap();
    let labels: Vec<&str> = risk.pairs.iter().map(|p| p.original.as_str()).collect();
    assert_eq!(labels, vec!["High", "Low", "Medium"]);

    let salary = response
        .splits
        .iter()
        .find(|s| s.target == Target::Salary)
        .unwrap();
    assert_eq!(salary.skipped_rows, 1);
    assert_eq!(salary.test_rows, 13);
    assert_eq!(salary.train_rows, 28);

    let growth = response
        .splits
        .iter()
        .find(|s| s.target == Target::Growth)
        .unwrap();
    assert_eq!(growth.test_rows, 5);
    assert_eq!(growth.label, "Job_Growth_Projection");
}

#[test]
fn test_cleaning_page_partition_previews() {
    let (_dir, ctx) = trained_context();
    let response = commands::cleaning_page(&ctx).unwrap();

    for split in &response.splits {
        let preview = &split.preview;
        let features: Vec<String> = split.features.iter().map(|f| f.to_string()).collect();
        let label = vec![split.target.label_field().encoded_name().to_string()];

        assert_eq!(preview.x_train.headers, features);
        assert_eq!(preview.x_test.headers, features);
        assert_eq!(preview.y_train.headers, label);
        assert_eq!(preview.y_test.headers, label);

        assert_eq!(preview.x_train.total_rows, split.train_rows);
        assert_eq!(preview.y_train.total_rows, split.train_rows);
        assert_eq!(preview.x_test.total_rows, split.test_rows);
        assert_eq!(preview.y_test.total_rows, split.test_rows);
        assert_eq!(preview.x_train.rows.len(), PARTITION_PREVIEW_ROWS);
        assert_eq!(
            preview.x_test.rows.len(),
            split.test_rows.min(PARTITION_PREVIEW_ROWS)
        );

        // Labels are codes of the target's label mapping.
        let classes = ctx.encoder().mapping(split.target.label_field());
        for row in preview.y_train.rows.iter().chain(&preview.y_test.rows) {
            let code: u32 = row[0].parse().unwrap();
            assert!(classes.decode(code).is_some());
        }
    }

    let text = response.render_text();
    assert!(text.contains("Split Preview"));
    for name in ["X_train", "X_test", "Y_train", "Y_test"] {
        assert!(text.contains(name));
    }
}

#[test]
fn test_split_summary_matches_training() {
    let (_dir, ctx) = trained_context();
    for model in commands::machine_learning_page(&ctx).models {
        let split = commands::split_summary(&ctx, model.info.target, &TrainingConfig::default())
            .unwrap();
        assert_eq!(split.train_rows, model.train_rows);
        assert_eq!(split.test_rows, model.test_rows);
        assert_eq!(split.skipped_rows, model.skipped_rows);
    }
}

#[test]
fn test_machine_learning_page() {
    let (_dir, ctx) = trained_context();
    let response = commands::machine_learning_page(&ctx);

    let targets: Vec<Target> = response.models.iter().map(|m| m.info.target).collect();
    assert_eq!(targets, Target::ALL.to_vec());
    for model in &response.models {
        assert!((0.0..=1.0).contains(&model.test_accuracy));
        assert_eq!(
            model.feature_importance.len(),
            model.info.target.feature_set().len()
        );
        assert_eq!(model.confusion.total(), model.test_rows);
    }
    let text = response.render_text();
    assert!(text.contains("Feature importance"));
    for model in &response.models {
        let rendered = model.render_text();
        for feature in &model.feature_importance {
            assert!(rendered.contains(feature.name.as_str()));
        }
    }
}

#[test]
fn test_conclusion_page() {
    let (_dir, ctx) = trained_context();
    let response = commands::conclusion_page(&ctx).unwrap();

    assert_eq!(response.rows, 42);
    assert_eq!(response.insights.len(), 3);
    let growth = response
        .insights
        .iter()
        .find(|i| i.target == Target::Growth)
        .unwrap();
    assert_eq!(growth.majority_class.as_deref(), Some("Growth"));
    assert!((growth.majority_share - 17.0 / 42.0).abs() < 1e-9);
    assert!(growth.top_feature.is_some());
}

// ============================================================================
// Prediction
// ============================================================================

#[test]
fn test_default_inputs_use_first_values() {
    let (_dir, ctx) = trained_context();
    let inputs = default_inputs(&ctx);

    assert_eq!(inputs.get(Field::JobTitle), Some("Data Scientist"));
    assert_eq!(inputs.get(Field::Industry), Some("Tech"));
    assert_eq!(inputs.get(Field::JobGrowthProjection), Some("Growth"));
    assert_eq!(inputs.salary(), Some(0.0));

    let options = field_options(&ctx);
    assert_eq!(options.len(), 9);
    assert!(options.iter().all(|o| o.default.as_ref() == o.options.first()));
}

#[test]
fn test_prediction_with_defaults() {
    let (_dir, ctx) = trained_context();
    let response = prediction_page(&ctx, default_inputs(&ctx), &DisplayFilters::new()).unwrap();

    assert_eq!(response.salary_category.value().map(String::as_str), Some("Entry Level"));
    assert_eq!(response.predictions.len(), 3);
    assert!(response.predictions.iter().all(|p| p.outcome.is_ok()));
    assert!(response.dataset.is_none());
    assert!(response.class_samples.is_empty());
    assert!(response.selected_classes.is_empty());
}

#[test]
fn test_unknown_category_fails_each_prediction() {
    let (_dir, ctx) = trained_context();
    let inputs = default_inputs(&ctx)
        .with(Field::Industry, "Mining")
        .with_salary(120_000.0);
    let response = prediction_page(&ctx, inputs, &DisplayFilters::new()).unwrap();

    // The salary bucket does not depend on the industry.
    assert_eq!(response.salary_category.value().map(String::as_str), Some("Senior Level"));
    for prediction in &response.predictions {
        let error = prediction.outcome.error().expect("prediction should fail");
        assert_eq!(error.code, "UNKNOWN_CATEGORY");
        assert!(error.message.contains("Mining"));
    }
}

#[test]
fn test_out_of_range_salary_keeps_salary_prediction() {
    let (_dir, ctx) = trained_context();
    let inputs = default_inputs(&ctx).with_salary(250_000.0);
    let response = prediction_page(&ctx, inputs, &DisplayFilters::new()).unwrap();

    assert_eq!(
        response.salary_category.error().map(|e| e.code.as_str()),
        Some("OUT_OF_RANGE_SALARY")
    );
    let salary = response
        .predictions
        .iter()
        .find(|p| p.target == Target::Salary)
        .unwrap();
    assert!(matches!(salary.outcome, Outcome::Ok { .. }));
}

#[test]
fn test_salary_input_range() {
    assert_eq!(salary_input(0.0).unwrap(), 0.0);
    assert_eq!(salary_input(5_000_000.0).unwrap(), 5_000_000.0);
    assert_eq!(
        salary_input(-1.0).unwrap_err().error_code(),
        "INVALID_SELECTION"
    );
    assert!(salary_input(f64::NAN).is_err());
}

#[test]
fn test_display_filters() {
    let (_dir, ctx) = trained_context();
    let stable: ClassToggle = "growth=Stable".parse().unwrap();
    let filters = DisplayFilters::new()
        .with_dataset(true)
        .with_all_classes(true)
        .with_class(stable);
    let response = prediction_page(&ctx, default_inputs(&ctx), &filters).unwrap();

    let dataset = response.dataset.as_ref().unwrap();
    assert_eq!(dataset.rows.len(), 42);

    // Three classes for each of the three targets.
    assert_eq!(response.class_samples.len(), 9);
    assert!(response.class_samples.iter().all(|s| s.table.rows.len() <= 5));
    assert_eq!(
        response.class_samples[0].heading,
        "Automation_Risk: Low"
    );

    assert_eq!(response.selected_classes.len(), 1);
    assert_eq!(response.selected_classes[0].heading, "Growth Projection: Stable");
    assert_eq!(response.selected_classes[0].table.total_rows, 12);
}

#[test]
fn test_render_page_fills_missing_inputs() {
    let (_dir, ctx) = trained_context();
    let partial = insight_processing::RawInputs::new().with(Field::Location, "USA");
    let nav = prediction_nav(DisplayFilters::new());

    let response = render_page(&ctx, &nav, &partial).unwrap();
    let PageResponse::Prediction(prediction) = &response else {
        panic!("expected the prediction page, got {:?}", response.page());
    };
    assert_eq!(prediction.inputs, with_defaults(&ctx, &partial));
    assert_eq!(prediction.inputs.salary(), Some(0.0));
}

#[test]
fn test_every_page_renders() {
    let (_dir, ctx) = trained_context();
    let inputs = default_inputs(&ctx);
    for page in Page::ALL {
        let response = render_page(&ctx, &Navigation::new(page), &inputs).unwrap();
        assert_eq!(response.page(), page);
        assert!(!response.render_text().is_empty());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["page"], page.as_str());
    }
}
