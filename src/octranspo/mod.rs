//! OC Transpo (Ottawa) feeds.

pub mod commons;
pub mod train;

pub use train::OttawaOcTranspoTrainRules;
