//! Statistics module - per-group descriptive statistics

mod calculator;

pub use calculator::{describe, sem, ChannelStats};
