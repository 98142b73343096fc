use analysis_core::{stats, AnalysisError};

/// Maps values linearly onto [0, 1] using the min and max seen at fit time.
///
/// A constant input has zero range; it is treated as a range of 1 so every
/// value maps to 0 and inverts back to the minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    pub fn fit(data: &[f64]) -> Result<Self, AnalysisError> {
        if data.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidData("Cannot scale non-finite prices".to_string()));
        }
        let (min, max) = stats::min_max(data)
            .ok_or_else(|| AnalysisError::InsufficientData("Cannot fit scaler on empty series".to_string()))?;
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            1.0
        } else {
            range
        }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }

    pub fn transform_all(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&v| self.transform(v)).collect()
    }

    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        scaled * self.range() + self.min
    }
}
