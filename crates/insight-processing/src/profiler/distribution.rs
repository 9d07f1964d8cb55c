//! Class distributions and per-class sample tables.

use crate::dataset::JobDataset;
use crate::error::{Result, ResultExt};
use crate::schema::Field;
use crate::types::{ClassCount, ClassDistribution};
use polars::prelude::*;

/// Value counts of `field`, most frequent first.
///
/// Ties keep first-seen order. Null values (unclassified salaries) are not
/// counted.
pub fn class_distribution(dataset: &JobDataset, field: Field) -> Result<ClassDistribution> {
    let name = field.column_name();
    let values = dataset
        .dataframe()
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?
        .drop_nulls();
    let value_counts = values
        .value_counts(false, false, "count".into(), false)
        .context(format!("Counting values of {field}"))?;

    let labels = value_counts.column(name)?.as_materialized_series().clone();
    let tallies = value_counts
        .column("count")?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    let mut counts: Vec<(String, usize)> = labels
        .str()?
        .into_iter()
        .zip(tallies.u64()?)
        .filter_map(|(label, count)| Some((label?.to_string(), count? as usize)))
        .collect();

    let first_seen = dataset.unique_values(field);
    let rank = |label: &str| first_seen.iter().position(|v| *v == label);
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| rank(&a.0).cmp(&rank(&b.0))));

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let classes = counts
        .into_iter()
        .map(|(label, count)| ClassCount {
            label: label.to_string(),
            count,
            percentage: if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();

    Ok(ClassDistribution {
        field: name.to_string(),
        total,
        classes,
    })
}

/// Rows whose `field` equals `value`, truncated to `limit` rows if given.
pub fn class_samples(
    dataset: &JobDataset,
    field: Field,
    value: &str,
    limit: Option<usize>,
) -> Result<DataFrame> {
    let df = dataset.dataframe();
    let column = df
        .column(field.column_name())?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let mask = column.str()?.equal(value);
    let filtered = df
        .filter(&mask)
        .context(format!("Filtering {field} == '{value}'"))?;
    Ok(match limit {
        Some(n) => filtered.head(Some(n)),
        None => filtered,
    })
}

/// Up to `per_class` rows for every class of `field`, in distribution order.
pub fn samples_per_class(
    dataset: &JobDataset,
    field: Field,
    per_class: usize,
) -> Result<Vec<(String, DataFrame)>> {
    class_distribution(dataset, field)?
        .classes
        .into_iter()
        .map(|class| {
            let rows = class_samples(dataset, field, &class.label, Some(per_class))?;
            Ok((class.label, rows))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_dataset;

    #[test]
    fn test_distribution_counts_and_order() {
        let dist = class_distribution(&sample_dataset(), Field::JobTitle).unwrap();
        assert_eq!(dist.total, 3);
        assert_eq!(dist.classes[0].label, "Data Scientist");
        assert_eq!(dist.classes[0].count, 2);
        assert_eq!(dist.count_of("HR Manager"), Some(1));
    }

    #[test]
    fn test_distribution_skips_unclassified() {
        let dist = class_distribution(&sample_dataset(), Field::SalaryCategory).unwrap();
        assert_eq!(dist.total, 2);
        assert_eq!(dist.classes[0].label, "Senior Level");
        assert_eq!(dist.classes[1].label, "Entry Level");
        assert_eq!(dist.classes[0].percentage, 50.0);
    }

    #[test]
    fn test_class_samples() {
        let dataset = sample_dataset();
        let rows = class_samples(&dataset, Field::JobTitle, "Data Scientist", None).unwrap();
        assert_eq!(rows.height(), 2);

        let limited = class_samples(&dataset, Field::JobTitle, "Data Scientist", Some(1)).unwrap();
        assert_eq!(limited.height(), 1);

        let none = class_samples(&dataset, Field::Industry, "Mining", None).unwrap();
        assert_eq!(none.height(), 0);
    }

    #[test]
    fn test_class_samples_on_derived_column() {
        let dataset = sample_dataset();
        let rows = class_samples(&dataset, Field::SalaryCategory, "Entry Level", None).unwrap();
        assert_eq!(rows.height(), 1);
    }

    #[test]
    fn test_samples_per_class() {
        let samples = samples_per_class(&sample_dataset(), Field::AutomationRisk, 5).unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|(_, df)| df.height() == 1));
    }
}
