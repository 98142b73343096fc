use analysis_core::{AnalysisError, BandPosition, IndicatorSet, RsiZone, SignalLabel, SignalReport};

/// Map the latest readings to a trading signal.
///
/// Rules are evaluated top to bottom and the first match wins:
/// 1. `rsi < 30` and close below the lower band -> Strong Buy
/// 2. `rsi < 40` -> Buy
/// 3. `rsi > 70` and close above the upper band -> Strong Sell
/// 4. `rsi > 60` -> Sell
/// 5. otherwise Neutral
pub fn classify(rsi: f64, close: f64, lower_band: f64, upper_band: f64) -> SignalLabel {
    if rsi < 30.0 && close < lower_band {
        SignalLabel::StrongBuy
    } else if rsi < 40.0 {
        SignalLabel::Buy
    } else if rsi > 70.0 && close > upper_band {
        SignalLabel::StrongSell
    } else if rsi > 60.0 {
        SignalLabel::Sell
    } else {
        SignalLabel::Neutral
    }
}

pub fn rsi_zone(rsi: f64) -> RsiZone {
    if rsi < 30.0 {
        RsiZone::Oversold
    } else if rsi > 70.0 {
        RsiZone::Overbought
    } else {
        RsiZone::Neutral
    }
}

pub fn band_position(close: f64, lower_band: f64, upper_band: f64) -> BandPosition {
    if close < lower_band {
        BandPosition::BelowLower
    } else if close > upper_band {
        BandPosition::AboveUpper
    } else {
        BandPosition::WithinBands
    }
}

fn rsi_phrase(zone: RsiZone) -> &'static str {
    match zone {
        RsiZone::Oversold => "RSI is below 30, indicating an oversold condition with a potential rebound.",
        RsiZone::Overbought => "RSI is above 70, indicating an overbought condition with potential corrections.",
        RsiZone::Neutral => "RSI is in a neutral range.",
    }
}

fn band_phrase(position: BandPosition) -> &'static str {
    match position {
        BandPosition::BelowLower => "The stock price is below the lower band, indicating a potential technical rebound.",
        BandPosition::AboveUpper => "The stock price is above the upper band, indicating a potential technical correction.",
        BandPosition::WithinBands => "The stock price is moving normally within the Bollinger Bands.",
    }
}

/// Descriptive reading of RSI and band position, independent of the signal label.
pub fn interpret(rsi: f64, close: f64, lower_band: f64, upper_band: f64) -> Vec<String> {
    vec![
        rsi_phrase(rsi_zone(rsi)).to_string(),
        band_phrase(band_position(close, lower_band, upper_band)).to_string(),
    ]
}

/// Build the full signal report for the latest bar.
///
/// Every indicator must be defined on that bar.
pub fn signal_report(close: f64, latest: &IndicatorSet) -> Result<SignalReport, AnalysisError> {
    let missing = |name: &str| {
        AnalysisError::InsufficientData(format!("{} undefined on latest bar ({})", name, latest.date))
    };
    let rsi = latest.rsi.ok_or_else(|| missing("RSI"))?;
    let lower_band = latest.lower_band.ok_or_else(|| missing("lower band"))?;
    let upper_band = latest.upper_band.ok_or_else(|| missing("upper band"))?;

    let label = classify(rsi, close, lower_band, upper_band);

    Ok(SignalReport {
        label,
        close,
        rsi,
        lower_band,
        upper_band,
        rsi_zone: rsi_zone(rsi),
        band_position: band_position(close, lower_band, upper_band),
        recommendation: label.recommendation().to_string(),
        interpretation: interpret(rsi, close, lower_band, upper_band),
    })
}
