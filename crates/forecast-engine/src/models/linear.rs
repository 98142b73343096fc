use analysis_core::AnalysisError;
use linfa_linalg::svd::SVD;
use ndarray::{Array1, Array2, Axis};

use super::{flatten, labels, model_error, PriceModel};
use crate::windows::FeatureWindow;

/// Singular values below this fraction of the largest are treated as zero.
const RCOND: f64 = 1e-10;

/// Ordinary least squares on the flattened window (with intercept).
///
/// Solved through an SVD of the centered design matrix, so fewer windows
/// than features or collinear features still give the minimum-norm fit.
#[derive(Debug, Clone, Default)]
pub struct LinearModel;

impl LinearModel {
    pub fn new() -> Self {
        Self
    }
}

fn to_matrix(windows: &[FeatureWindow]) -> Result<Array2<f64>, AnalysisError> {
    let (rows, cols, flat) = flatten(windows)?;
    Array2::from_shape_vec((rows, cols), flat).map_err(|e| model_error("linear regression", e))
}

/// Coefficients and intercept of the minimum-norm least-squares fit.
fn least_squares(x: &Array2<f64>, y: &Array1<f64>) -> Result<(Array1<f64>, f64), AnalysisError> {
    let (x_mean, y_mean) = match (x.mean_axis(Axis(0)), y.mean()) {
        (Some(x_mean), Some(y_mean)) => (x_mean, y_mean),
        _ => return Err(AnalysisError::InsufficientData("No windows to fit on".to_string())),
    };
    let centered = x - &x_mean;
    let y_centered = y - y_mean;

    let mut coefficients = Array1::<f64>::zeros(x.ncols());
    // U is rebuilt from V below
    let (_, sigma, vt) = centered
        .svd(false, true)
        .map_err(|e| model_error("linear regression", e))?;

    if let Some(vt) = vt {
        let s_max = sigma.iter().copied().fold(0.0, f64::max);
        let cutoff = s_max * RCOND;

        for (&s, v) in sigma.iter().zip(vt.rows()) {
            if s <= cutoff {
                continue;
            }
            let u = centered.dot(&v) / s;
            coefficients.scaled_add(u.dot(&y_centered) / s, &v);
        }
    }

    let intercept = y_mean - x_mean.dot(&coefficients);
    Ok((coefficients, intercept))
}

impl PriceModel for LinearModel {
    fn name(&self) -> &'static str {
        "Linear Regression"
    }

    fn fit_predict(&self, train: &[FeatureWindow], test: &[FeatureWindow]) -> Result<Vec<f64>, AnalysisError> {
        let (coefficients, intercept) = least_squares(&to_matrix(train)?, &Array1::from_vec(labels(train)))?;

        let predictions = to_matrix(test)?.dot(&coefficients) + intercept;
        Ok(predictions.to_vec())
    }
}
