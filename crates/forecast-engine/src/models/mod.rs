use analysis_core::AnalysisError;

use crate::windows::FeatureWindow;

mod linear;
mod lstm;
mod random_forest;

pub use linear::LinearModel;
pub use lstm::{LstmConfig, LstmModel};
pub use random_forest::RandomForestModel;

/// A regressor trained from scratch on every run.
pub trait PriceModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fit on `train` and predict the label of every `test` window, in scaled space.
    fn fit_predict(&self, train: &[FeatureWindow], test: &[FeatureWindow]) -> Result<Vec<f64>, AnalysisError>;
}

/// Window features laid out row-major, one row per window.
fn flatten(windows: &[FeatureWindow]) -> Result<(usize, usize, Vec<f64>), AnalysisError> {
    let width = windows
        .first()
        .map(|w| w.features.len())
        .ok_or_else(|| AnalysisError::InsufficientData("No windows to fit on".to_string()))?;
    if windows.iter().any(|w| w.features.len() != width) {
        return Err(AnalysisError::InvalidData("Windows differ in length".to_string()));
    }
    let flat = windows.iter().flat_map(|w| w.features.iter().copied()).collect();
    Ok((windows.len(), width, flat))
}

fn labels(windows: &[FeatureWindow]) -> Vec<f64> {
    windows.iter().map(|w| w.label).collect()
}

fn model_error(model: &str, e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Model(format!("{}: {}", model, e))
}
