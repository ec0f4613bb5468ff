//! Common library for the community service
//!
//! This crate provides the pieces shared by every implementation of the
//! community service and by the API service: the response envelope, the
//! error taxonomy, configuration, the per-call identity context and the
//! simulated latency.

pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod latency;

pub use crate::config::CommunityConfig;
pub use crate::context::RequestContext;
pub use crate::envelope::ApiResponse;
pub use crate::error::{CommunityError, CommunityResult};
pub use crate::latency::Latency;

/// Example usage of the envelope
///
/// ```rust
/// use common::{ApiResponse, CommunityError};
///
/// let ok = ApiResponse::ok("hello");
/// assert!(ok.is_success());
///
/// let failed: ApiResponse<()> =
///     ApiResponse::from_result(Err(CommunityError::NotImplemented), "Failed to get discussion");
/// assert_eq!(failed.error.as_deref(), Some("Not implemented"));
/// ```
pub fn example_usage() {}
