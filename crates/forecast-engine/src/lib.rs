//! Next-close forecasting from sliding windows of min-max scaled closes.
//!
//! Three independent regressors are trained on the same windows and each
//! contributes one forecast; the ensemble reports their mean.

pub mod ensemble;
pub mod models;
pub mod scaler;
pub mod windows;

pub use ensemble::{ForecastConfig, ForecastEngine};
pub use models::{LinearModel, LstmConfig, LstmModel, PriceModel, RandomForestModel};
pub use scaler::MinMaxScaler;
pub use windows::{build_windows, train_test_split, FeatureWindow, TrainTestSplit};
