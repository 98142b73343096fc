use analysis_core::AnalysisError;
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{linear, lstm, AdamW, Dropout, LSTMConfig, Linear, Optimizer, ParamsAdamW, VarBuilder, VarMap, LSTM, RNN};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::{flatten, labels, model_error, PriceModel};
use crate::windows::FeatureWindow;

/// Training settings for the stacked LSTM
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LstmConfig {
    pub units: usize,
    pub dropout: f32,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl Default for LstmConfig {
    fn default() -> Self {
        Self {
            units: 50,
            dropout: 0.2,
            epochs: 10,
            batch_size: 32,
            learning_rate: 0.001,
        }
    }
}

/// LSTM(units, full sequence) -> Dropout -> LSTM(units, last step) -> Dropout -> Dense(1)
struct StackedLstm {
    first: LSTM,
    second: LSTM,
    dropout: Dropout,
    dense: Linear,
}

impl StackedLstm {
    fn new(config: &LstmConfig, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            first: lstm(1, config.units, LSTMConfig::default(), vb.pp("lstm_1"))?,
            second: lstm(config.units, config.units, LSTMConfig::default(), vb.pp("lstm_2"))?,
            dropout: Dropout::new(config.dropout),
            dense: linear(config.units, 1, vb.pp("dense"))?,
        })
    }

    /// `xs` is (batch, lookback, 1); the result is (batch, 1).
    fn forward(&self, xs: &Tensor, train: bool) -> candle_core::Result<Tensor> {
        let states = self.first.seq(xs)?;
        let hidden = self.first.states_to_tensor(&states)?;
        let hidden = self.dropout.forward(&hidden, train)?;

        let states = self.second.seq(&hidden)?;
        let last = states
            .last()
            .ok_or_else(|| candle_core::Error::Msg("empty input sequence".to_string()))?
            .h()
            .clone();
        let last = self.dropout.forward(&last, train)?;
        self.dense.forward(&last)
    }
}

/// (n, lookback, 1) features and (n, 1) labels as f32 tensors.
fn to_tensors(windows: &[FeatureWindow], device: &Device) -> Result<(Tensor, Tensor), AnalysisError> {
    let (rows, cols, flat) = flatten(windows)?;
    let flat: Vec<f32> = flat.into_iter().map(|v| v as f32).collect();
    let targets: Vec<f32> = labels(windows).into_iter().map(|v| v as f32).collect();

    let xs = Tensor::from_vec(flat, (rows, cols, 1), device).map_err(|e| model_error("LSTM", e))?;
    let ys = Tensor::from_vec(targets, (rows, 1), device).map_err(|e| model_error("LSTM", e))?;
    Ok((xs, ys))
}

/// Recurrent regressor over the window read as a 1-feature sequence.
///
/// Weights are initialised and batches shuffled without a fixed seed, so two
/// runs on the same data give slightly different forecasts.
#[derive(Debug, Clone, Default)]
pub struct LstmModel {
    config: LstmConfig,
}

impl LstmModel {
    pub fn new(config: LstmConfig) -> Self {
        Self { config }
    }

    fn train(&self, x_train: &Tensor, y_train: &Tensor, n: usize, device: &Device) -> candle_core::Result<StackedLstm> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = StackedLstm::new(&self.config, vb)?;
        let mut optimizer = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: self.config.learning_rate,
                weight_decay: 0.0,
                ..Default::default()
            },
        )?;

        let mut order: Vec<u32> = (0..n as u32).collect();
        let mut rng = rand::thread_rng();

        for epoch in 0..self.config.epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0f32;

            for batch in order.chunks(self.config.batch_size) {
                let idx = Tensor::from_slice(batch, batch.len(), device)?;
                let xs = x_train.index_select(&idx, 0)?;
                let ys = y_train.index_select(&idx, 0)?;

                let predictions = model.forward(&xs, true)?;
                let loss = candle_nn::loss::mse(&predictions, &ys)?;
                optimizer.backward_step(&loss)?;
                epoch_loss += loss.to_scalar::<f32>()? * batch.len() as f32;
            }

            tracing::debug!(epoch = epoch + 1, loss = epoch_loss / n as f32, "LSTM epoch finished");
        }

        Ok(model)
    }
}

impl PriceModel for LstmModel {
    fn name(&self) -> &'static str {
        "LSTM"
    }

    fn fit_predict(&self, train: &[FeatureWindow], test: &[FeatureWindow]) -> Result<Vec<f64>, AnalysisError> {
        if self.config.batch_size == 0 || self.config.units == 0 {
            return Err(AnalysisError::InvalidData(
                "LSTM batch size and units must be at least 1".to_string(),
            ));
        }

        let device = Device::Cpu;
        let (x_train, y_train) = to_tensors(train, &device)?;
        let (x_test, _) = to_tensors(test, &device)?;

        let model = self
            .train(&x_train, &y_train, train.len(), &device)
            .map_err(|e| model_error(self.name(), e))?;

        let predictions = model
            .forward(&x_test, false)
            .and_then(|p| p.flatten_all())
            .and_then(|p| p.to_vec1::<f32>())
            .map_err(|e| model_error(self.name(), e))?;

        Ok(predictions.into_iter().map(f64::from).collect())
    }
}
