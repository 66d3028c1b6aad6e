//! Canonical donation record and source tags.
//!
//! Every inbound provider payload is reshaped into a [`DonationRecord`]
//! before it is published. Field names serialize in camelCase because the
//! game-side subscriber decodes them that way.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Inbound route that produced a donation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationSource {
    /// Saweria donation webhook.
    Saweria,
    /// SocialBuzz donation webhook.
    SocialBuzz,
    /// Manual test endpoint.
    Test,
}

impl DonationSource {
    /// Donation platforms with a webhook route.
    pub const PLATFORMS: [Self; 2] = [Self::Saweria, Self::SocialBuzz];

    /// Returns the wire name of this source.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saweria => "Saweria",
            Self::SocialBuzz => "SocialBuzz",
            Self::Test => "Test",
        }
    }
}

impl fmt::Display for DonationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationSource {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Saweria" => Ok(Self::Saweria),
            "SocialBuzz" => Ok(Self::SocialBuzz),
            "Test" => Ok(Self::Test),
            other => Err(RelayError::InvalidPayload(format!("unknown donation source: {other}"))),
        }
    }
}

/// Provider-agnostic donation forwarded to the publish endpoint.
///
/// `amount` is always a whole, non-negative number of currency units and
/// `timestamp` is the relay's wall clock (unix seconds) at processing time,
/// never the provider's event time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    /// Target in-game username.
    pub username: String,
    /// Donor display name as reported by the provider.
    pub display_name: String,
    /// Donated amount, floored to whole units.
    pub amount: u64,
    /// Processing time in unix seconds.
    pub timestamp: u64,
    /// Route that produced this record.
    pub source: DonationSource,
    /// Free-text donor message.
    pub message: String,
    /// Donor email, empty when not provided.
    pub email: String,
}
