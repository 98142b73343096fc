use analysis_core::AnalysisError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// `lookback` consecutive scaled closes and the scaled close that follows them
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWindow {
    pub features: Vec<f64>,
    pub label: f64,
}

/// Overlapping windows: for each `i` in `lookback..len`, features are
/// `scaled[i - lookback..i]` and the label is `scaled[i]`.
pub fn build_windows(scaled: &[f64], lookback: usize) -> Result<Vec<FeatureWindow>, AnalysisError> {
    if lookback == 0 {
        return Err(AnalysisError::InvalidData("Lookback must be at least 1".to_string()));
    }
    if scaled.len() <= lookback {
        return Err(AnalysisError::InsufficientData(format!(
            "Need more than {} closes to build a training window, got {}",
            lookback,
            scaled.len()
        )));
    }

    Ok((lookback..scaled.len())
        .map(|i| FeatureWindow {
            features: scaled[i - lookback..i].to_vec(),
            label: scaled[i],
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<FeatureWindow>,
    pub test: Vec<FeatureWindow>,
}

/// Shuffle with a fixed seed and hold out `ceil(test_fraction * n)` windows.
///
/// The test windows keep their shuffled order, so the "last" test window is
/// whichever one the permutation put there, not the most recent in time.
pub fn train_test_split(
    windows: Vec<FeatureWindow>,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, AnalysisError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(AnalysisError::InvalidData(format!(
            "Test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let n = windows.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(AnalysisError::InsufficientData(format!(
            "{} windows leave {} for training and {} for testing",
            n, n_train, n_test
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let pick = |idx: &[usize]| idx.iter().map(|&i| windows[i].clone()).collect::<Vec<_>>();
    Ok(TrainTestSplit {
        test: pick(&order[..n_test]),
        train: pick(&order[n_test..]),
    })
}
