//! Application ID scanning against an Azure AD tenant.
//!
//! This module provides:
//! - A token endpoint probe that provokes a diagnostic error per application ID
//! - Classification of the returned AADSTS error code
//! - A rate-limited dispatcher over a bounded worker pool
//! - Aggregation of outcomes in input order

pub mod aggregate;
pub mod classify;
pub mod dispatcher;
pub mod models;
pub mod probe;

pub use aggregate::{aggregate, ScanResult};
pub use dispatcher::{DispatchSettings, Dispatcher};
pub use models::Candidate;
pub use probe::{Probe, TokenEndpointProbe};
