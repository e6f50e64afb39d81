//! # devtrust-cli
//!
//! Command-line front end for the devtrust engine. Works against JSON files:
//! device histories, fingerprints, and registry snapshots.
//!
//! ## Commands
//!
//! - **score**: trust score and breakdown for a device history
//! - **match**: rank catalogued devices against a fingerprint
//! - **hash**: canonical fingerprint hash
//! - **verify**: full verification of a device in a registry snapshot
//! - **register**: store a device's fingerprint in a snapshot
//! - **config**: show or initialize engine configuration

pub mod cli;
pub mod output;

pub use cli::run;
