//! Split paired image / annotation datasets into named parts such as
//! train, val and test.
//!
//! Keys are read from filenames (optionally through a regex template),
//! checked for consistency between images and annotations, split by relative
//! part sizes and copied into `<output>/<part>/` directories.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::{SplitConfig, DEFAULT_CONFIG_NAME};
pub use error::{SplitError, SplitResult};
pub use pipeline::{run, run_with_rng, PartSummary, SplitSummary};
