//! The tools module provides the helper stages and plumbing for the rlehuff compressor.
//!
//! The tools are:
//! - cli: Command line interface and options.
//! - data_io: Reading input files and writing results.
//! - freq_count: Frequency count of the run-length data.
//! - report: File sizes and compression ratios.
//! - rle: Run-Length-Encoding, the first compression stage.
//!
pub mod cli;
pub mod data_io;
pub mod freq_count;
pub mod report;
pub mod rle;
