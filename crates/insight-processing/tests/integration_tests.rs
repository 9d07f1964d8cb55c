//! Integration tests for loading, encoding and profiling the job table.

use insight_processing::{
    DatasetConfig, DatasetProfiler, EncodingLayer, Field, JobDataset, ProcessingError,
    RawInputs, SalaryBucket, Target, class_distribution, samples_per_class,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_sample() -> JobDataset {
    let config = DatasetConfig::builder()
        .data_path(fixtures_path().join("jobs_sample.csv"))
        .build()
        .expect("valid config");
    JobDataset::load(&config).expect("Failed to load fixture")
}

fn data_scientist() -> RawInputs {
    RawInputs::new()
        .with(Field::JobTitle, "Data Scientist")
        .with(Field::Industry, "Tech")
        .with(Field::CompanySize, "Large")
        .with(Field::Location, "USA")
        .with(Field::AiAdoptionLevel, "High")
        .with(Field::AutomationRisk, "Low")
        .with(Field::RequiredSkills, "Python")
        .with(Field::RemoteFriendly, "Yes")
        .with(Field::JobGrowthProjection, "Growth")
        .with_salary(120_000.0)
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_fixture() {
    let dataset = load_sample();
    assert_eq!(dataset.len(), 42);
    assert_eq!(dataset.records()[0].job_title, "Data Scientist");
    assert_eq!(dataset.records()[0].salary_usd, 120_000.0);
    assert_eq!(dataset.salary_buckets()[0], SalaryBucket::SeniorLevel);
}

#[test]
fn test_missing_column_file_rejected() {
    let err = JobDataset::from_csv_path(fixtures_path().join("missing_column.csv")).unwrap_err();
    match err {
        ProcessingError::MissingColumns(columns) => assert_eq!(columns, vec!["Industry"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_is_artifact_load() {
    let err = JobDataset::from_csv_path(fixtures_path().join("nope.csv")).unwrap_err();
    assert_eq!(err.error_code(), "ARTIFACT_LOAD");
    assert!(!err.is_recoverable());
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_canonical_class_lists() {
    let encoder = EncodingLayer::fit(&load_sample()).unwrap();
    assert_eq!(
        encoder.mapping(Field::AutomationRisk).classes(),
        &["High", "Low", "Medium"]
    );
    assert_eq!(
        encoder.mapping(Field::JobGrowthProjection).classes(),
        &["Decline", "Growth", "Stable"]
    );
    assert_eq!(
        encoder.mapping(Field::SalaryCategory).classes(),
        &["Entry Level", "Mid Level", "Senior Level"]
    );
}

#[test]
fn test_every_mapping_round_trips() {
    let encoder = EncodingLayer::fit(&load_sample()).unwrap();
    for mapping in encoder.mappings() {
        for (code, value) in mapping.classes().iter().enumerate() {
            assert_eq!(mapping.encode(value).unwrap(), code as u32);
            assert_eq!(mapping.decode(code as u32), Some(value.as_str()));
        }
    }
}

#[test]
fn test_encoded_table_excludes_unclassified_salary() {
    let dataset = load_sample();
    let encoder = EncodingLayer::fit(&dataset).unwrap();
    let table = encoder.transform(&dataset).unwrap();

    let salary_codes = table.column(Field::SalaryCategory);
    assert_eq!(salary_codes.iter().filter(|c| c.is_none()).count(), 1);

    let matrix = Target::Salary
        .feature_set()
        .training_matrix(&table, Field::SalaryCategory);
    assert_eq!(matrix.len(), 41);
}

#[test]
fn test_end_to_end_encoding_scenario() {
    let dataset = load_sample();
    let encoder = EncodingLayer::fit(&dataset).unwrap();
    let inputs = data_scientist();

    assert_eq!(
        SalaryBucket::classify(inputs.salary().unwrap()),
        SalaryBucket::SeniorLevel
    );
    for target in Target::ALL {
        let vector = target.feature_set().assemble(&encoder, &inputs).unwrap();
        assert_eq!(vector.len(), 9);
    }

    let unknown = inputs.clone().with(Field::Industry, "Mining");
    let err = Target::Automation
        .feature_set()
        .assemble(&encoder, &unknown)
        .unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(err.error_code(), "UNKNOWN_CATEGORY");
}

// ============================================================================
// Profiling
// ============================================================================

#[test]
fn test_cleaning_report_on_fixture() {
    let dataset = load_sample();
    let report = DatasetProfiler::cleaning_report(&dataset).unwrap();
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(report.numeric_columns, vec!["Salary_USD"]);
    assert_eq!(report.total_nulls(), 1);
}

#[test]
fn test_describe_on_fixture() {
    let summaries = DatasetProfiler::describe(&load_sample()).unwrap();
    let salary = &summaries[0];
    assert_eq!(salary.count, 42);
    assert!(salary.min <= salary.q25 && salary.q25 <= salary.median);
    assert!(salary.median <= salary.q75 && salary.q75 <= salary.max);
    assert_eq!(salary.max, 205_000.0);
}

#[test]
fn test_distributions_sum_to_total() {
    let dataset = load_sample();
    for field in [
        Field::AutomationRisk,
        Field::JobGrowthProjection,
        Field::SalaryCategory,
    ] {
        let dist = class_distribution(&dataset, field).unwrap();
        let sum: usize = dist.classes.iter().map(|c| c.count).sum();
        assert_eq!(sum, dist.total);
        let pct: f64 = dist.classes.iter().map(|c| c.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_show_all_classes_five_rows_each() {
    let samples = samples_per_class(&load_sample(), Field::JobGrowthProjection, 5).unwrap();
    assert_eq!(samples.len(), 3);
    for (_, rows) in &samples {
        assert_eq!(rows.height(), 5);
    }
}
