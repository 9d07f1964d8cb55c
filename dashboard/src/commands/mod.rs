//! Page commands.
//!
//! Each page is a function of the immutable [`AppContext`] returning a
//! serializable response that the CLI prints as text or JSON.

pub mod about;
pub mod cleaning;
pub mod conclusion;
pub mod dataset;
pub mod eda;
pub mod ml;
pub mod prediction;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::page::{Navigation, Page};
use crate::state::AppContext;
use insight_processing::RawInputs;

pub use about::{AboutResponse, about};
pub use cleaning::{
    CleaningResponse, PARTITION_PREVIEW_ROWS, SplitPreview, SplitSummary, cleaning_page,
    split_summary,
};
pub use conclusion::{ConclusionResponse, TargetInsight, conclusion_page};
pub use dataset::{DatasetResponse, dataset_page};
pub use eda::{EdaResponse, eda_page};
pub use ml::{
    MachineLearningResponse, ModelSummary, TrainResponse, machine_learning_page, train_models,
};
pub use prediction::{
    FieldOptions, Outcome, PredictionResponse, SampleTable, TargetPrediction, default_inputs,
    field_options, prediction_page, salary_input, with_defaults,
};

/// The rendered content of one page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", content = "content", rename_all = "snake_case")]
pub enum PageResponse {
    About(AboutResponse),
    Dataset(Box<DatasetResponse>),
    Eda(EdaResponse),
    DataCleaning(CleaningResponse),
    MachineLearning(MachineLearningResponse),
    Prediction(Box<PredictionResponse>),
    Conclusion(ConclusionResponse),
}

impl PageResponse {
    pub fn page(&self) -> Page {
        match self {
            Self::About(_) => Page::About,
            Self::Dataset(_) => Page::Dataset,
            Self::Eda(_) => Page::Eda,
            Self::DataCleaning(_) => Page::DataCleaning,
            Self::MachineLearning(_) => Page::MachineLearning,
            Self::Prediction(_) => Page::Prediction,
            Self::Conclusion(_) => Page::Conclusion,
        }
    }

    pub fn render_text(&self) -> String {
        match self {
            Self::About(r) => r.render_text(),
            Self::Dataset(r) => r.render_text(),
            Self::Eda(r) => r.render_text(),
            Self::DataCleaning(r) => r.render_text(),
            Self::MachineLearning(r) => r.render_text(),
            Self::Prediction(r) => r.render_text(),
            Self::Conclusion(r) => r.render_text(),
        }
    }
}

/// Render the page `nav` points at.
///
/// `inputs` only matter on the prediction page; fields left out fall back to
/// their defaults.
pub fn render_page(
    ctx: &AppContext,
    nav: &Navigation,
    inputs: &RawInputs,
) -> Result<PageResponse> {
    debug!("Rendering page {}", nav.page());
    Ok(match nav.page() {
        Page::About => PageResponse::About(about()),
        Page::Dataset => PageResponse::Dataset(Box::new(dataset_page(ctx)?)),
        Page::Eda => PageResponse::Eda(eda_page(ctx)?),
        Page::DataCleaning => PageResponse::DataCleaning(cleaning_page(ctx)?),
        Page::MachineLearning => PageResponse::MachineLearning(machine_learning_page(ctx)),
        Page::Prediction => {
            let inputs = with_defaults(ctx, inputs);
            PageResponse::Prediction(Box::new(prediction_page(ctx, inputs, nav.filters())?))
        }
        Page::Conclusion => PageResponse::Conclusion(conclusion_page(ctx)?),
    })
}
