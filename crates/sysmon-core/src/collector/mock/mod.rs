//! Mock filesystem and prebuilt `/proc` scenarios for tests.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
