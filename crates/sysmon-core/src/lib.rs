//! sysmon-core: procfs statistics layer for the sysmon terminal monitor.
//!
//! Provides:
//! - `collector`: filesystem abstraction, `/proc` parsers, the system and
//!   per-process readers, and the snapshot collector
//! - `config`: process-root and filename table shared by the readers
//! - `rates`: caller-owned state for interval CPU rates
//! - `fmt`: elapsed-time, percentage and text formatting
//! - `models`: snapshot value types handed to the display layer

pub mod collector;
pub mod config;
pub mod fmt;
pub mod models;
pub mod rates;
