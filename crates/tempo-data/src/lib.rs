#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/datakinetics/tempo/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod sample;
pub mod schema;

pub use error::{DataError, Result};
pub use loader::{Dataset, LoadOptions, load_csv};
pub use sample::{sample_frame, write_sample_csv};
pub use schema::{ColumnRoles, DEFAULT_EXCLUDED, classify_columns};
