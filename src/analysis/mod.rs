pub mod analyzer;
pub mod classifier;

pub use analyzer::{AnalysisReport, DataOrigin, StockAnalyzer};
