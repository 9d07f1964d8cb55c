//! Job Insight - terminal dashboard over the AI-powered job market table.
//!
//! The dashboard loads the table and the three trained classifiers once,
//! then renders one of seven pages:
//!
//! ```text
//! -------------------------------------------------------------------
//! |                       job-insight CLI                           |
//! |                                                                 |
//! |  ---------------   ---------------   -------------------------  |
//! |  |  Navigation |   |  AppContext |   |     Page commands     |  |
//! |  |  - Page     |-->|  (loaded    |-->|  - about              |  |
//! |  |  - Display  |   |   once)     |   |  - dataset / eda      |  |
//! |  |    Filters  |   ---------------   |  - data cleaning      |  |
//! |  ---------------                     |  - machine learning   |  |
//! |                                      |  - prediction         |  |
//! |                                      |  - conclusion         |  |
//! |                                      -------------------------  |
//! |                                                                 |
//! |  Responses are printed as text sections or as JSON (--json).    |
//! -------------------------------------------------------------------
//! ```
//!
//! # Modules
//!
//! - [`state`]: configuration and the immutable application context
//! - [`page`]: page selection and prediction-page display filters
//! - [`commands`]: one function per page plus training
//! - [`render`]: plain-text tables and sections
//! - [`error`]: [`DashboardError`] with codes carried over from the libraries

pub mod commands;
pub mod error;
pub mod page;
pub mod render;
pub mod state;

pub use commands::{PageResponse, render_page};
pub use error::{DashboardError, ErrorPayload, Result};
pub use page::{ClassToggle, DisplayFilters, Navigation, Page, ParsePageError};
pub use render::TableView;
pub use state::{AppConfig, AppContext, DataContext};
