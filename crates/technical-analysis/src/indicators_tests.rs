#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use analysis_core::Bar;
    use chrono::{Duration, NaiveDate};

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
            46.21, 46.25, 45.71, 46.45, 45.78, 45.35, 44.03, 44.18, 44.22, 44.57,
        ]
    }

    // Helper function to create bars from closes
    fn bars_from(closes: &[f64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000000.0,
            })
            .collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 0.001); // (1+2+3)/3 = 2
        assert!((result[1] - 3.0).abs() < 0.001); // (2+3+4)/3 = 3
        assert!((result[2] - 4.0).abs() < 0.001); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        let result = sma(&data, 5);

        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_rolling_std_uses_sample_variance() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let result = rolling_std(&data, 8);

        assert_eq!(result.len(), 1);
        assert!((result[0] - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_length_and_range() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        // First value lines up with bar 13
        assert_eq!(result.len(), prices.len() - 13);
        for &value in &result {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_matches_hand_computation() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        // Window for bar 13 covers deltas 1..=13 plus the zero delta of bar 0
        let mut gain = 0.0;
        let mut loss = 0.0;
        for i in 1..14 {
            let change: f64 = prices[i] - prices[i - 1];
            if change > 0.0 {
                gain += change;
            } else {
                loss -= change;
            }
        }
        let expected = 100.0 - 100.0 / (1.0 + gain / loss);
        assert!((result[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let data = vec![1.0, 2.0, 3.0];
        let result = rsi(&data, 14);

        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_rsi_no_losses_reads_100() {
        let uptrend: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&uptrend, 14);

        assert!(result.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_rsi_flat_window_reads_50() {
        let result = rsi(&[100.0; 30], 14);

        assert_eq!(result.len(), 17);
        assert!(result.iter().all(|&v| v == 50.0));
    }

    #[test]
    fn test_rsi_from_averages_is_finite() {
        assert_eq!(rsi_from_averages(0.0, 0.0), 50.0);
        assert_eq!(rsi_from_averages(1.0, 0.0), 100.0);
        assert_eq!(rsi_from_averages(0.0, 1.0), 0.0);
        assert!((rsi_from_averages(1.0, 1.0) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_bollinger_bands_basic() {
        let prices = sample_prices();
        let result = bollinger_bands(&prices, 20, 2.0);

        assert_eq!(result.upper.len(), prices.len() - 19);
        assert_eq!(result.upper.len(), result.middle.len());
        assert_eq!(result.middle.len(), result.lower.len());
    }

    #[test]
    fn test_bollinger_bands_ordering() {
        let prices = sample_prices();
        let result = bollinger_bands(&prices, 10, 2.0);

        // Upper band should be above middle, middle above lower
        for i in 0..result.upper.len() {
            assert!(result.upper[i] >= result.middle[i]);
            assert!(result.middle[i] >= result.lower[i]);
        }
    }

    #[test]
    fn test_bollinger_bands_constant_prices_collapse() {
        let result = bollinger_bands(&[100.0; 30], 20, 2.0);

        for i in 0..result.upper.len() {
            assert_eq!(result.upper[i], 100.0);
            assert_eq!(result.middle[i], 100.0);
            assert_eq!(result.lower[i], 100.0);
        }
    }

    #[test]
    fn test_bollinger_bands_collapse_for_inexact_constants() {
        // Values whose running sum does not divide back exactly
        for value in [101.37, 0.1, 123.456] {
            let result = bollinger_bands(&[value; 25], 20, 2.0);
            assert_eq!(result.middle.len(), 6);
            for i in 0..result.middle.len() {
                assert_eq!(result.middle[i], value);
                assert_eq!(result.upper[i], value);
                assert_eq!(result.lower[i], value);
            }
            assert!(rolling_std(&[value; 25], 20).iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn test_indicator_sets_flat_tail_after_movement() {
        let mut closes = sample_prices();
        closes.extend([101.37; 20]);
        let sets = indicator_sets(&bars_from(&closes), &IndicatorConfig::default());

        let last = sets.last().unwrap();
        assert_eq!(last.sma, Some(101.37));
        assert_eq!(last.upper_band, Some(101.37));
        assert_eq!(last.lower_band, Some(101.37));
    }

    #[test]
    fn test_indicator_sets_constant_series() {
        let sets = indicator_sets(&bars_from(&[100.0; 30]), &IndicatorConfig::default());

        assert_eq!(sets.len(), 30);
        for (i, set) in sets.iter().enumerate() {
            if i < 13 {
                assert!(set.rsi.is_none(), "rsi defined too early at {}", i);
            } else {
                assert_eq!(set.rsi, Some(50.0));
            }
            if i < 19 {
                assert!(set.sma.is_none());
                assert!(set.upper_band.is_none());
                assert!(set.lower_band.is_none());
            }
        }
        assert_eq!(sets[19].sma, Some(100.0));
        assert_eq!(sets[19].upper_band, Some(100.0));
        assert_eq!(sets[19].lower_band, Some(100.0));
    }

    #[test]
    fn test_indicator_sets_band_invariant() {
        let prices = sample_prices();
        let sets = indicator_sets(&bars_from(&prices), &IndicatorConfig::default());

        for set in &sets {
            if let (Some(upper), Some(mid), Some(lower)) = (set.upper_band, set.sma, set.lower_band) {
                assert!(upper >= mid && mid >= lower);
            }
        }
        assert!(sets.last().unwrap().rsi.is_some());
    }

    #[test]
    fn test_indicator_sets_short_series_stays_undefined() {
        let sets = indicator_sets(&bars_from(&[10.0, 11.0, 12.0]), &IndicatorConfig::default());

        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|s| s.rsi.is_none() && s.sma.is_none()));
    }

    #[test]
    fn test_indicator_sets_keep_bar_dates() {
        let bars = bars_from(&sample_prices());
        let sets = indicator_sets(&bars, &IndicatorConfig::default());

        for (bar, set) in bars.iter().zip(&sets) {
            assert_eq!(bar.date, set.date);
        }
    }
}
