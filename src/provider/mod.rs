pub mod client;

pub use client::HistoryClient;
