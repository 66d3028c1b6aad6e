//! Core domain models for the donation relay.
//!
//! Provides the canonical donation record, per-provider payload
//! normalization, username extraction and the error taxonomy shared by the
//! publish client and the HTTP layer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod normalize;
pub mod time;
pub mod username;

pub use error::{RelayError, Result};
pub use models::{DonationRecord, DonationSource};
pub use normalize::{
    normalize, parse_payload, synthetic_record, Normalized, ProviderProfile, SAWERIA, SOCIALBUZZ,
};
pub use time::{Clock, RealClock, TestClock};
pub use username::extract_username;
