//! Discussion models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Pagination, UserSummary};

/// Discussion thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub replies: u32,
    pub views: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reply: Option<LastReply>,
    pub is_pinned: bool,
    pub is_solved: bool,
    #[serde(default)]
    pub is_scholarly: bool,
    pub tags: Vec<String>,
}

/// Summary of the latest reply in a discussion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastReply {
    pub author_name: String,
    /// Human-readable relative time, e.g. "2h ago"
    pub timestamp: String,
}

/// Reply to a discussion; snake_case on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionReply {
    pub id: String,
    pub discussion_id: String,
    pub user_id: String,
    pub content: String,
    pub likes_count: u32,
    pub is_accepted_answer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_reply_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: UserSummary,
}

/// Request for creating a discussion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Request for replying to a discussion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReplyRequest {
    pub discussion_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_reply_id: Option<String>,
}

/// Response for discussion listing with pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionsResponse {
    pub discussions: Vec<Discussion>,
    pub pagination: Pagination,
}
