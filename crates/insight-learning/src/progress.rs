//! Progress reporting types for training.
//!
//! This module defines [`TrainingStage`], [`ProgressUpdate`] and the
//! [`ProgressCallback`] type alias used by [`Trainer`](crate::Trainer).
//!
//! # Example
//!
//! ```
//! use insight_learning::ProgressUpdate;
//!
//! let on_progress = |update: ProgressUpdate| {
//!     println!(
//!         "[{}] {:.0}% - {}",
//!         update.stage.as_str(),
//!         update.progress * 100.0,
//!         update.message
//!     );
//!     if let Some((done, total)) = update.targets_completed {
//!         println!("  Targets: {}/{}", done, total);
//!     }
//! };
//! # let _ = on_progress;
//! ```

use std::sync::Arc;

/// The current stage of a training run.
///
/// Each target moves through these stages in order:
///
/// 1. [`Initializing`](Self::Initializing) - Validating configuration
/// 2. [`Splitting`](Self::Splitting) - Selecting rows and splitting train/test
/// 3. [`Training`](Self::Training) - Growing the forest
/// 4. [`Evaluation`](Self::Evaluation) - Scoring and ranking features
/// 5. [`Complete`](Self::Complete) - Artifact ready
///
/// Terminal states: [`Complete`](Self::Complete), [`Failed`](Self::Failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum TrainingStage {
    #[default]
    Initializing,
    Splitting,
    Training,
    Evaluation,
    Complete,
    Failed,
}

impl TrainingStage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStage::Initializing => "initializing",
            TrainingStage::Splitting => "splitting",
            TrainingStage::Training => "training",
            TrainingStage::Evaluation => "evaluation",
            TrainingStage::Complete => "complete",
            TrainingStage::Failed => "failed",
        }
    }
}

/// A progress update sent to the callback during training.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressUpdate {
    /// The current training stage.
    pub stage: TrainingStage,

    /// Overall progress from 0.0 to 1.0 across every target of the run.
    pub progress: f64,

    /// Human-readable status message.
    pub message: String,

    /// Target currently being trained, e.g. `"automation"`.
    pub current_target: Option<String>,

    /// Number of targets completed and total: `(completed, total)`.
    pub targets_completed: Option<(u32, u32)>,
}

/// Type alias for a progress callback function.
///
/// Callbacks must be `Send + Sync` so a [`Trainer`](crate::Trainer) holding
/// one can be shared.
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_are_distinct() {
        let names: std::collections::HashSet<&str> = [
            TrainingStage::Initializing,
            TrainingStage::Splitting,
            TrainingStage::Training,
            TrainingStage::Evaluation,
            TrainingStage::Complete,
            TrainingStage::Failed,
        ]
        .iter()
        .map(TrainingStage::as_str)
        .collect();
        assert_eq!(names.len(), 6);
        assert_eq!(TrainingStage::default().as_str(), "initializing");
    }
}
