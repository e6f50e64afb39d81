//! Core types for the devtrust device registry engine.
//!
//! This crate provides the value types shared by the engine and its callers:
//!
//! - **History**: ownership transfers, device events and disputes fed to the
//!   trust score calculator
//! - **Score**: the bounded trust score with its auditable component breakdown
//! - **Fingerprint**: hardware/sensor signals and the ranked match candidates
//!   produced from them
//! - **Errors**: [`RegistryError`] for the storage and orchestration layers
//!
//! # Example
//!
//! ```rust,ignore
//! use devtrust_core::{DeviceHistory, RiskCategory};
//!
//! let history = DeviceHistory::default();
//! assert!(history.is_empty());
//! assert_eq!(RiskCategory::from_score(85), RiskCategory::Low);
//! ```

#![doc(html_root_url = "https://docs.rs/devtrust-core/0.1.0")]

mod error;
pub mod types;

pub use error::{RegistryError, Result};
pub use types::*;
