//! Lifestyle analytics: loads daily sleep/study/exercise records, computes
//! summary statistics, and builds report and render-plan outputs for the
//! dashboard rendering surface.

pub mod config;
pub mod ingest;
pub mod models;
pub mod render;
pub mod report;
pub mod stats;
