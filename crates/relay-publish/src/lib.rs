//! Publish client for Roblox MessagingService topics.
//!
//! Forwards canonical donation records to a single configured topic. Each
//! call is one HTTP attempt: there is no retry, backoff or circuit breaker,
//! and the caller decides what a failure means for its own response.
//!
//! # Example
//!
//! ```no_run
//! use relay_core::DonationRecord;
//! use relay_publish::{client::publish_url, PublishClient, PublishConfig, PublishError};
//!
//! # async fn example(record: DonationRecord) -> Result<(), PublishError> {
//! let url = publish_url("https://apis.roblox.com", "123456", "MedusaIDRBroadcast");
//! let client = PublishClient::new(PublishConfig::new(url, "api-key"))?;
//!
//! let response = client.publish(&record).await?;
//! println!("published with status {}", response.status_code);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;

pub use client::{MessageEnvelope, PublishClient, PublishConfig, PublishResponse};
pub use error::{ErrorCategory, PublishError, Result};
