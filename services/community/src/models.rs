//! Transport records for request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod conversation;
pub mod discussion;
pub mod post;
pub mod user;

pub use conversation::*;
pub use discussion::*;
pub use post::*;
pub use user::*;

/// Compact user record used for authors, participants and search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl UserSummary {
    /// Summary carrying only an id and a display name
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
            is_online: None,
            last_seen: None,
            bio: None,
        }
    }
}

/// Pagination block attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub has_next: bool,
}

impl Pagination {
    /// Single-page pagination over a result set of `total` items
    pub fn single_page(page: u32, limit: u32, total: usize) -> Self {
        Self {
            page,
            limit,
            total: u32::try_from(total).unwrap_or(u32::MAX),
            has_next: false,
        }
    }
}
