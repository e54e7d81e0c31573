// ---------------------------------------------------------------------------
// Daily bar type
// ---------------------------------------------------------------------------

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's record for a symbol, as delivered by the history
/// provider.  Immutable once fetched.
///
/// A series is an ordered `Vec<DailyBar>` with dates unique and strictly
/// ascending.  Missing trading days simply do not appear; no gaps are filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Calendar date of the trading day.
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    /// Shares traded.
    pub volume: u64,
    /// Turnover in currency units.
    pub amount: f64,
    /// Intraday swing (high − low) as a percentage of the previous close.
    pub amplitude: f64,
    /// Close-to-close change in percent.
    pub change_pct: f64,
    /// Close-to-close change in currency units.
    pub change_amount: f64,
    /// Volume as a percentage of tradable shares.
    pub turnover_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip_preserves_all_fields() {
        let bar = DailyBar {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            open: 10.1,
            close: 10.5,
            high: 10.6,
            low: 10.0,
            volume: 1_234_567,
            amount: 12_950_000.0,
            amplitude: 5.9,
            change_pct: 3.96,
            change_amount: 0.4,
            turnover_rate: 1.2,
        };

        let json = serde_json::to_string(&bar).unwrap();
        let back: DailyBar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, back);
    }

    #[test]
    fn date_serialises_as_iso_string() {
        let bar = DailyBar {
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            open: 1.0,
            close: 1.0,
            high: 1.0,
            low: 1.0,
            volume: 0,
            amount: 0.0,
            amplitude: 0.0,
            change_pct: 0.0,
            change_amount: 0.0,
            turnover_rate: 0.0,
        };
        let json = serde_json::to_value(&bar).unwrap();
        assert_eq!(json["date"], "2025-01-15");
    }
}
