//! Community service for the mobile client
//!
//! Defines the contract of the posts, discussions, messaging and user-search
//! sub-services, plus two implementations of it: a fixture-backed
//! [`MockCommunityService`] for offline use and tests, and an
//! [`HttpCommunityService`] talking to a real backend. Callers depend on
//! [`CommunityService`] and pick an implementation at construction time.
//!
//! ```rust
//! use common::{CommunityConfig, RequestContext};
//! use community::{MockCommunityService, PostService};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let service = MockCommunityService::new(&CommunityConfig::without_delay());
//! let response = service.list_posts(&RequestContext::anonymous(), 1, 10).await;
//! assert!(response.success);
//! # }
//! ```

pub mod fixtures;
pub mod http;
pub mod mock;
pub mod models;
pub mod service;

pub use crate::http::HttpCommunityService;
pub use crate::mock::MockCommunityService;
pub use crate::service::{
    CommunityService, DiscussionService, MessagingService, PostService, UserDirectory,
};
