use analysis_core::AnalysisError;
use smartcore::ensemble::random_forest_regressor::{RandomForestRegressor, RandomForestRegressorParameters};
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::{labels, model_error, PriceModel};
use crate::windows::FeatureWindow;

/// Bagged regression trees on the flattened window, every feature considered at each split.
#[derive(Debug, Clone)]
pub struct RandomForestModel {
    pub n_trees: usize,
}

impl RandomForestModel {
    pub fn new(n_trees: usize) -> Self {
        Self { n_trees }
    }
}

impl Default for RandomForestModel {
    fn default() -> Self {
        Self::new(100)
    }
}

fn to_matrix(windows: &[FeatureWindow]) -> Result<DenseMatrix<f64>, AnalysisError> {
    let rows: Vec<&[f64]> = windows.iter().map(|w| w.features.as_slice()).collect();
    DenseMatrix::from_2d_array(&rows).map_err(|e| model_error("random forest", e))
}

impl PriceModel for RandomForestModel {
    fn name(&self) -> &'static str {
        "Random Forest"
    }

    fn fit_predict(&self, train: &[FeatureWindow], test: &[FeatureWindow]) -> Result<Vec<f64>, AnalysisError> {
        if self.n_trees == 0 {
            return Err(AnalysisError::InvalidData("Random forest needs at least one tree".to_string()));
        }
        let width = train.first().map(|w| w.features.len()).unwrap_or(0);
        let x_train = to_matrix(train)?;
        let y_train = labels(train);

        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees)
            .with_m(width);
        let model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>> =
            RandomForestRegressor::fit(&x_train, &y_train, params).map_err(|e| model_error(self.name(), e))?;

        model
            .predict(&to_matrix(test)?)
            .map_err(|e| model_error(self.name(), e))
    }
}
