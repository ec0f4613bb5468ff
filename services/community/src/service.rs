//! Community service contract
//!
//! Each sub-service is its own trait; `CommunityService` is the union that the
//! API service and application code depend on. Every operation takes the
//! caller's `RequestContext` explicitly and returns an `ApiResponse`; failures
//! never escape as `Err` or panics.

use async_trait::async_trait;
use common::{ApiResponse, RequestContext};

use crate::models::{
    AddCommentRequest, Comment, Conversation, ConversationsResponse, CreateConversationRequest,
    CreateDiscussionRequest, CreatePostRequest, CreateReplyRequest, CurrentUser, Discussion,
    DiscussionReply, DiscussionsResponse, Message, Post, PostsResponse, SendMessageRequest,
    SyncUserRequest, UpdatePostRequest, UserSearchResponse,
};

/// First page number
pub const DEFAULT_PAGE: u32 = 1;

/// Page size for posts and discussions
pub const DEFAULT_LIMIT: u32 = 10;

/// Page size for user search
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Posts, likes, polls and comments
#[async_trait]
pub trait PostService: Send + Sync {
    async fn list_posts(
        &self,
        ctx: &RequestContext,
        page: u32,
        limit: u32,
    ) -> ApiResponse<PostsResponse>;

    async fn create_post(&self, ctx: &RequestContext, request: CreatePostRequest)
    -> ApiResponse<Post>;

    async fn like_post(&self, ctx: &RequestContext, post_id: &str) -> ApiResponse<()>;

    async fn unlike_post(&self, ctx: &RequestContext, post_id: &str) -> ApiResponse<()>;

    async fn vote_on_poll(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        option_id: &str,
    ) -> ApiResponse<()>;

    async fn update_post(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        request: UpdatePostRequest,
    ) -> ApiResponse<Post>;

    async fn delete_post(&self, ctx: &RequestContext, post_id: &str) -> ApiResponse<()>;

    async fn get_post_comments(
        &self,
        ctx: &RequestContext,
        post_id: &str,
    ) -> ApiResponse<Vec<Comment>>;

    async fn add_comment(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        request: AddCommentRequest,
    ) -> ApiResponse<Comment>;
}

/// Discussion threads and their replies
#[async_trait]
pub trait DiscussionService: Send + Sync {
    /// List discussions. `category` is forwarded to the backend but the
    /// fixture implementation does not filter on it.
    async fn list_discussions(
        &self,
        ctx: &RequestContext,
        page: u32,
        limit: u32,
        category: Option<&str>,
    ) -> ApiResponse<DiscussionsResponse>;

    async fn create_discussion(
        &self,
        ctx: &RequestContext,
        request: CreateDiscussionRequest,
    ) -> ApiResponse<Discussion>;

    async fn reply_to_discussion(
        &self,
        ctx: &RequestContext,
        request: CreateReplyRequest,
    ) -> ApiResponse<()>;

    async fn list_discussion_replies(
        &self,
        ctx: &RequestContext,
        discussion_id: &str,
    ) -> ApiResponse<Vec<DiscussionReply>>;

    async fn get_discussion(
        &self,
        ctx: &RequestContext,
        discussion_id: &str,
    ) -> ApiResponse<Discussion>;
}

/// Conversations and direct messages
#[async_trait]
pub trait MessagingService: Send + Sync {
    async fn list_conversations(&self, ctx: &RequestContext) -> ApiResponse<ConversationsResponse>;

    async fn list_messages(
        &self,
        ctx: &RequestContext,
        conversation_id: &str,
    ) -> ApiResponse<Vec<Message>>;

    async fn send_message(
        &self,
        ctx: &RequestContext,
        request: SendMessageRequest,
    ) -> ApiResponse<Message>;

    async fn mark_message_read(&self, ctx: &RequestContext, message_id: &str) -> ApiResponse<()>;

    async fn mark_conversation_read(
        &self,
        ctx: &RequestContext,
        conversation_id: &str,
    ) -> ApiResponse<()>;

    async fn create_conversation(
        &self,
        ctx: &RequestContext,
        request: CreateConversationRequest,
    ) -> ApiResponse<Conversation>;

    async fn delete_conversation(
        &self,
        ctx: &RequestContext,
        conversation_id: &str,
    ) -> ApiResponse<()>;
}

/// User search and identity bookkeeping
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn search_users(
        &self,
        ctx: &RequestContext,
        query: &str,
        page: u32,
        limit: u32,
    ) -> ApiResponse<UserSearchResponse>;

    /// Record a profile handed over by the identity provider
    async fn sync_user(&self, ctx: &RequestContext, profile: SyncUserRequest) -> ApiResponse<()>;

    /// Identity the service acts as for this caller
    async fn current_user(&self, ctx: &RequestContext) -> ApiResponse<CurrentUser>;
}

/// Full community service surface
pub trait CommunityService: PostService + DiscussionService + MessagingService + UserDirectory {}

impl<T> CommunityService for T where
    T: PostService + DiscussionService + MessagingService + UserDirectory
{
}
