//! HTTP request handlers for the relay API.
//!
//! Handlers are grouped by functionality:
//! - `donation` - provider webhook routes
//! - `test_publish` - manual publish for checking the integration
//! - `info` - service metadata and configuration debug output
//!
//! Every handler answers with exactly one response and performs at most one
//! publish. Errors are turned into responses where they happen; nothing
//! propagates past the handler.

pub mod donation;
pub mod info;
pub mod test_publish;

pub use donation::{saweria_webhook, socialbuzz_webhook};
pub use info::{debug_info, service_info};
pub use test_publish::test_publish;
