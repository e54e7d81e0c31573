// =============================================================================
// Technical Classifier — trend / momentum / volatility labels + verdict
// =============================================================================
//
// Reads the most recent bar of an augmented series plus one series-wide
// aggregate (mean amplitude) and emits three categorical labels, then folds
// them into a Buy/Sell/Hold verdict through a fixed decision table.  No
// scoring, no weights.
//
// Rules, evaluated against the final bar unless noted:
//   trend      = Up if MA5 > MA20 else Down      (strict `>`; ties are Down)
//   momentum   = Strong if RSI6 > 70, Weak if RSI6 < 30, else Neutral
//   volatility = High if mean(amplitude) over the whole series > 3 %, else Low
// =============================================================================

use crate::error::{AnalysisError, AnalysisResult};
use crate::indicators::AugmentedSeries;
use crate::types::{Momentum, Recommendation, TechnicalSummary, Trend, Volatility};

/// RSI level above which momentum reads Strong.
const RSI_STRONG: f64 = 70.0;
/// RSI level below which momentum reads Weak.
const RSI_WEAK: f64 = 30.0;
/// Mean daily amplitude (percent) above which volatility reads High.
const HIGH_AMPLITUDE_PCT: f64 = 3.0;

/// Classify an augmented series into a [`TechnicalSummary`].
///
/// Fails with `InvalidInput` if the series is empty or the final bar's
/// MA5/MA20/RSI6 columns are still unfilled (insufficient history).
pub fn classify(series: &AugmentedSeries) -> AnalysisResult<TechnicalSummary> {
    let (_, row) = series.latest().ok_or_else(|| {
        AnalysisError::InvalidInput("cannot classify an empty series".to_string())
    })?;

    let ma5 = require(row.ma5, "MA5", series.len())?;
    let ma20 = require(row.ma20, "MA20", series.len())?;
    let rsi6 = require(row.rsi6, "RSI6", series.len())?;

    let trend = if ma5 > ma20 { Trend::Up } else { Trend::Down };

    let momentum = if rsi6 > RSI_STRONG {
        Momentum::Strong
    } else if rsi6 < RSI_WEAK {
        Momentum::Weak
    } else {
        Momentum::Neutral
    };

    let mean_amplitude =
        series.bars.iter().map(|b| b.amplitude).sum::<f64>() / series.len() as f64;
    let volatility = if mean_amplitude > HIGH_AMPLITUDE_PCT {
        Volatility::High
    } else {
        Volatility::Low
    };

    Ok(TechnicalSummary {
        trend,
        momentum,
        volatility,
    })
}

/// Fold a summary into the final verdict.
///
/// Buy on a rising trend with strong momentum, Sell on a falling trend with
/// weak momentum, Hold for every other combination.
pub fn recommend(summary: &TechnicalSummary) -> Recommendation {
    match (summary.trend, summary.momentum) {
        (Trend::Up, Momentum::Strong) => Recommendation::Buy,
        (Trend::Down, Momentum::Weak) => Recommendation::Sell,
        _ => Recommendation::Hold,
    }
}

fn require(value: Option<f64>, column: &str, len: usize) -> AnalysisResult<f64> {
    value.ok_or_else(|| {
        AnalysisError::InvalidInput(format!(
            "{column} is undefined on the final bar ({len} bars is insufficient history)"
        ))
    })
}
