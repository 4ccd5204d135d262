#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/datakinetics/tempo/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use tempo_core as analysis;
pub use tempo_data as data;
pub use tempo_output as output;

// Re-export the pipeline entry points
pub use pipeline::{PipelineError, analyze_file, auto_configs};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
