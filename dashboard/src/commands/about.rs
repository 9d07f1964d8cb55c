//! About page.

use serde::Serialize;

use crate::page::Page;
use crate::render::section;

// ============================================================================
// TYPES
// ============================================================================

pub const APP_TITLE: &str = "AI-Powered Job Market Insight";

const ABOUT_TEXT: &str = "Performs Exploratory Data Analysis (EDA), Data Preprocessing and \
Supervised Machine Learning to classify Salary_USD, Automation_Risk and Job_Growth_Projection \
from the AI-Powered Job Market Insights dataset using a Random Forest Classifier.";

#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub page: Page,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutResponse {
    pub title: &'static str,
    pub description: &'static str,
    pub pages: Vec<PageSummary>,
}

impl AboutResponse {
    pub fn render_text(&self) -> String {
        let pages: String = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, p)| format!("  {}. `{}` - {}\n", i + 1, p.title, p.description))
            .collect();
        format!(
            "{}\n{}",
            section(self.title, self.description),
            section("Pages", &pages)
        )
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Static description of the dashboard and its pages.
pub fn about() -> AboutResponse {
    AboutResponse {
        title: APP_TITLE,
        description: ABOUT_TEXT,
        pages: Page::ALL
            .into_iter()
            .filter(|p| *p != Page::About)
            .map(|page| PageSummary {
                page,
                title: page.title(),
                description: page.summary(),
            })
            .collect(),
    }
}
