//! Entry construction, hull construction and hull analysis.

pub mod analysis;
pub mod config;
pub mod entries;
pub mod error;
pub mod hull;
pub mod progress;
