//! Page selection and display filters.

use insight_processing::{Field, SalaryBucket, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The dashboard pages, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    About,
    Dataset,
    Eda,
    DataCleaning,
    MachineLearning,
    Prediction,
    Conclusion,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::About,
        Page::Dataset,
        Page::Eda,
        Page::DataCleaning,
        Page::MachineLearning,
        Page::Prediction,
        Page::Conclusion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Page::About => "about",
            Page::Dataset => "dataset",
            Page::Eda => "eda",
            Page::DataCleaning => "data_cleaning",
            Page::MachineLearning => "machine_learning",
            Page::Prediction => "prediction",
            Page::Conclusion => "conclusion",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::About => "About",
            Page::Dataset => "Dataset",
            Page::Eda => "Exploratory Data Analysis (EDA)",
            Page::DataCleaning => "Data Cleaning and Data Pre-processing",
            Page::MachineLearning => "Machine Learning",
            Page::Prediction => "Prediction",
            Page::Conclusion => "Conclusion",
        }
    }

    /// One-line description shown on the About page.
    pub fn summary(self) -> &'static str {
        match self {
            Page::About => "What this dashboard does and how it is organized.",
            Page::Dataset => {
                "Brief description of the AI-Powered Job Market Insights dataset used in this dashboard."
            }
            Page::Eda => {
                "Distribution of Salary_USD, Automation_Risk and Job_Growth_Projection across the dataset."
            }
            Page::DataCleaning => {
                "Cleaning checks, label encoding of the categorical columns and the train/test splits."
            }
            Page::MachineLearning => {
                "Random Forest Classifier per target with model evaluation and feature importance."
            }
            Page::Prediction => {
                "Predict Salary, Automation Risk and Job Growth Projection from selected inputs."
            }
            Page::Conclusion => "A summary of the insights from the EDA and model training.",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a [`Page`] from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePageError {
    invalid_value: String,
}

impl ParsePageError {
    pub fn invalid_value(&self) -> &str {
        &self.invalid_value
    }
}

impl fmt::Display for ParsePageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<&str> = Page::ALL.iter().map(|p| p.as_str()).collect();
        write!(
            f,
            "unknown page '{}'. Valid values are: {}",
            self.invalid_value,
            valid.join(", ")
        )
    }
}

impl std::error::Error for ParsePageError {}

impl FromStr for Page {
    type Err = ParsePageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "about" => Ok(Page::About),
            "dataset" => Ok(Page::Dataset),
            "eda" => Ok(Page::Eda),
            "data_cleaning" | "cleaning" => Ok(Page::DataCleaning),
            "machine_learning" | "ml" => Ok(Page::MachineLearning),
            "prediction" | "predict" => Ok(Page::Prediction),
            "conclusion" => Ok(Page::Conclusion),
            _ => Err(ParsePageError {
                invalid_value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// DISPLAY FILTERS
// ============================================================================

/// A class whose rows should be listed on the prediction page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassToggle {
    pub target: Target,
    pub label: String,
}

impl ClassToggle {
    /// Every toggle the prediction page offers, in display order.
    pub fn all() -> Vec<ClassToggle> {
        let toggle = |target: Target, label: &str| ClassToggle {
            target,
            label: label.to_string(),
        };
        let mut toggles = vec![
            toggle(Target::Automation, "High"),
            toggle(Target::Automation, "Medium"),
            toggle(Target::Automation, "Low"),
            toggle(Target::Growth, "Growth"),
            toggle(Target::Growth, "Stable"),
            toggle(Target::Growth, "Decline"),
        ];
        toggles.extend(
            SalaryBucket::CLASSIFIED
                .iter()
                .filter_map(|b| b.label())
                .map(|label| toggle(Target::Salary, label)),
        );
        toggles
    }

    /// The column this toggle filters on.
    pub fn field(&self) -> Field {
        self.target.label_field()
    }

    /// Section heading for the toggle's rows.
    pub fn heading(&self) -> String {
        match self.target {
            Target::Automation => format!("{} Automation Risk", self.label),
            Target::Growth => format!("Growth Projection: {}", self.label),
            Target::Salary => format!("{} Salary", self.label),
        }
    }
}

impl FromStr for ClassToggle {
    type Err = ParsePageError;

    /// Parses `target=label`, e.g. `growth=Stable` or `salary=Mid Level`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePageError {
            invalid_value: s.to_string(),
        };
        let (target, label) = s.split_once('=').ok_or_else(invalid)?;
        let target: Target = target.parse().map_err(|_| invalid())?;
        ClassToggle::all()
            .into_iter()
            .find(|t| t.target == target && t.label.eq_ignore_ascii_case(label.trim()))
            .ok_or_else(invalid)
    }
}

/// What the prediction page shows besides the predictions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFilters {
    /// Show the whole table.
    pub show_dataset: bool,
    /// Show five rows of every class.
    pub show_all_classes: bool,
    /// Classes whose rows are listed in full.
    pub classes: BTreeSet<ClassToggle>,
}

impl DisplayFilters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dataset(mut self, show: bool) -> Self {
        self.show_dataset = show;
        self
    }

    #[must_use]
    pub fn with_all_classes(mut self, show: bool) -> Self {
        self.show_all_classes = show;
        self
    }

    #[must_use]
    pub fn with_class(mut self, toggle: ClassToggle) -> Self {
        self.classes.insert(toggle);
        self
    }

    /// Flip one class toggle; returns whether it is now on.
    pub fn toggle(&mut self, toggle: ClassToggle) -> bool {
        if self.classes.remove(&toggle) {
            false
        } else {
            self.classes.insert(toggle);
            true
        }
    }

    pub fn is_shown(&self, toggle: &ClassToggle) -> bool {
        self.classes.contains(toggle)
    }

    /// Selected toggles in display order.
    pub fn selected(&self) -> Vec<ClassToggle> {
        ClassToggle::all()
            .into_iter()
            .filter(|t| self.is_shown(t))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.show_dataset && !self.show_all_classes && self.classes.is_empty()
    }

    /// "Clear Results": everything off.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// NAVIGATION
// ============================================================================

/// The current page plus its filters.
///
/// Filters belong to the prediction page and are dropped when leaving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    page: Page,
    filters: DisplayFilters,
}

impl Navigation {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            filters: DisplayFilters::default(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn filters(&self) -> &DisplayFilters {
        &self.filters
    }

    /// Switch pages. Filters survive only while staying on the prediction page.
    pub fn select(&mut self, page: Page) {
        if page != self.page {
            self.filters.clear();
        }
        self.page = page;
    }

    /// Replace the filters; ignored outside the prediction page.
    pub fn set_filters(&mut self, filters: DisplayFilters) -> bool {
        if self.page == Page::Prediction {
            self.filters = filters;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.as_str().parse::<Page>().unwrap(), page);
        }
        assert_eq!("Data-Cleaning".parse::<Page>().unwrap(), Page::DataCleaning);
        assert_eq!("ml".parse::<Page>().unwrap(), Page::MachineLearning);
    }

    #[test]
    fn test_unknown_page() {
        let err = "home".parse::<Page>().unwrap_err();
        assert_eq!(err.invalid_value(), "home");
        assert!(err.to_string().contains("machine_learning"));
    }

    #[test]
    fn test_class_toggles() {
        let all = ClassToggle::all();
        assert_eq!(all.len(), 9);
        assert_eq!(all[6].label, "Entry Level");

        let toggle: ClassToggle = "salary=mid level".parse().unwrap();
        assert_eq!(toggle.label, "Mid Level");
        assert_eq!(toggle.field(), Field::SalaryCategory);
        assert_eq!(toggle.heading(), "Mid Level Salary");

        assert!("growth=Boom".parse::<ClassToggle>().is_err());
        assert!("Stable".parse::<ClassToggle>().is_err());
    }

    #[test]
    fn test_filters_toggle_and_clear() {
        let stable: ClassToggle = "growth=Stable".parse().unwrap();
        let high: ClassToggle = "automation=High".parse().unwrap();
        let mut filters = DisplayFilters::new().with_dataset(true);

        assert!(filters.toggle(stable.clone()));
        assert!(filters.toggle(high.clone()));
        assert_eq!(filters.selected(), vec![high.clone(), stable.clone()]);
        assert!(!filters.toggle(stable.clone()));
        assert!(!filters.is_shown(&stable));

        filters.clear();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_navigation_drops_filters() {
        let mut nav = Navigation::new(Page::Eda);
        assert!(!nav.set_filters(DisplayFilters::new().with_dataset(true)));

        nav.select(Page::Prediction);
        assert!(nav.set_filters(DisplayFilters::new().with_all_classes(true)));
        nav.select(Page::Prediction);
        assert!(nav.filters().show_all_classes);

        nav.select(Page::Conclusion);
        assert!(nav.filters().is_empty());
        assert_eq!(nav.page(), Page::Conclusion);
    }
}
