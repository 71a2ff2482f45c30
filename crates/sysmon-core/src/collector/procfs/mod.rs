//! Readers for the Linux `/proc` filesystem.
//!
//! `parser` holds pure functions over file contents; `system` and `process`
//! locate the files through [`crate::config::ProcPaths`] and turn parse
//! results into metrics.

pub mod parser;
pub mod process;
pub mod system;

pub use parser::ParseError;
pub use process::{CollectError, ProcessStatsReader};
pub use system::SystemStatsReader;
