#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/datakinetics/tempo/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod align;
pub mod config;
pub mod engine;
pub mod error;
pub mod growth;
pub mod key;
pub mod period;
pub mod summary;

pub use aggregate::{AggregatedValues, Aggregation, aggregate};
pub use align::{AlignedPeriods, align_periods};
pub use config::AnalysisConfig;
pub use engine::{AnalysisFailure, AnalysisResults, AnalysisTable, run_analyses, run_config};
pub use error::{AnalysisError, Result};
pub use growth::{GrowthRow, compute_growth, growth_ratio};
pub use key::DimensionKey;
pub use period::{
    Period, PeriodLabel, PeriodSet, date_from_epoch_days, epoch_days, latest_date, resolve_periods,
};
pub use summary::{GrowthStats, SummaryRow, summarize};
