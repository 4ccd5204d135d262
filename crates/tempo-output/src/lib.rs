#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/datakinetics/tempo/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod render;
pub mod report;

pub use export::{ExportError, ExportFormat, Exporter, export_results};
pub use report::{FailedAnalysis, Report, ReportBuilder, ReportError};
