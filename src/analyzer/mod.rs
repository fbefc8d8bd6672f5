//! Analyzer module - SEO scoring and audit engine

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::{AggregateStats, AuditEngine};
pub use scoring::ScoreCalculator;
