use analysis_core::{stats, AnalysisError, ForecastResult, ForecastSummary, Outlook};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{LinearModel, LstmConfig, LstmModel, PriceModel, RandomForestModel};
use crate::scaler::MinMaxScaler;
use crate::windows::{build_windows, train_test_split, TrainTestSplit};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub lookback: usize,
    pub test_fraction: f64,
    /// Seeds the train/test shuffle only; model internals stay unseeded.
    pub split_seed: u64,
    pub n_trees: usize,
    pub lstm: LstmConfig,
    /// Fit the models on the rayon pool instead of one after another
    pub parallel: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookback: 60,
            test_fraction: 0.2,
            split_seed: 42,
            n_trees: 100,
            lstm: LstmConfig::default(),
            parallel: true,
        }
    }
}

pub struct ForecastEngine {
    config: ForecastConfig,
    models: Vec<Box<dyn PriceModel>>,
}

impl ForecastEngine {
    pub fn new() -> Self {
        Self::with_config(ForecastConfig::default())
    }

    /// LSTM, random forest and linear regression, in that order.
    pub fn with_config(config: ForecastConfig) -> Self {
        let models: Vec<Box<dyn PriceModel>> = vec![
            Box::new(LstmModel::new(config.lstm)),
            Box::new(RandomForestModel::new(config.n_trees)),
            Box::new(LinearModel::new()),
        ];
        Self::with_models(config, models)
    }

    pub fn with_models(config: ForecastConfig, models: Vec<Box<dyn PriceModel>>) -> Self {
        Self { config, models }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the close following the last of `closes`.
    ///
    /// The scaler is fit on the whole series, test windows included.
    pub fn forecast(&self, closes: &[f64]) -> Result<ForecastSummary, AnalysisError> {
        if self.models.is_empty() {
            return Err(AnalysisError::InvalidData("Forecast engine has no models".to_string()));
        }
        let current_price = *closes
            .last()
            .ok_or_else(|| AnalysisError::InsufficientData("No closes to forecast from".to_string()))?;
        if current_price <= 0.0 {
            return Err(AnalysisError::InvalidData(format!(
                "Current close must be positive, got {}",
                current_price
            )));
        }

        let scaler = MinMaxScaler::fit(closes)?;
        let windows = build_windows(&scaler.transform_all(closes), self.config.lookback)?;
        let split = train_test_split(windows, self.config.test_fraction, self.config.split_seed)?;

        tracing::info!(
            closes = closes.len(),
            train = split.train.len(),
            test = split.test.len(),
            models = self.models.len(),
            "Training forecast models"
        );

        let scaled: Vec<Result<f64, AnalysisError>> = if self.config.parallel {
            self.models.par_iter().map(|m| last_test_prediction(m.as_ref(), &split)).collect()
        } else {
            self.models.iter().map(|m| last_test_prediction(m.as_ref(), &split)).collect()
        };

        let mut forecasts = Vec::with_capacity(self.models.len());
        for (model, prediction) in self.models.iter().zip(scaled) {
            let predicted_price = scaler.inverse_transform(prediction?);
            forecasts.push(ForecastResult {
                model_name: model.name().to_string(),
                predicted_price,
                delta_pct: stats::pct_change(predicted_price, current_price),
            });
        }

        let prices: Vec<f64> = forecasts.iter().map(|f| f.predicted_price).collect();
        let average_price = stats::mean(&prices);
        let average_delta_pct = stats::pct_change(average_price, current_price);

        Ok(ForecastSummary {
            current_price,
            forecasts,
            average_price,
            average_delta_pct,
            outlook: Outlook::from_delta_pct(average_delta_pct),
        })
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Fit one model and keep only its prediction for the last test window.
fn last_test_prediction(model: &dyn PriceModel, split: &TrainTestSplit) -> Result<f64, AnalysisError> {
    let predictions = model.fit_predict(&split.train, &split.test)?;
    let last = *predictions
        .last()
        .ok_or_else(|| AnalysisError::Model(format!("{} returned no predictions", model.name())))?;
    if !last.is_finite() {
        return Err(AnalysisError::Model(format!("{} produced a non-finite prediction", model.name())));
    }
    tracing::debug!(model = model.name(), scaled = last, "Model fitted");
    Ok(last)
}
