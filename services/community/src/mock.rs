//! In-memory fixture implementation of the community service
//!
//! Reads return fixture data; writes synthesize a record from the request and
//! forget it. Acknowledgements only log. Nothing is stored between calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    ApiResponse, CommunityConfig, CommunityResult, Latency, RequestContext,
    error::NOT_IMPLEMENTED_MESSAGE,
};
use tracing::{debug, info};

use crate::{
    fixtures,
    models::{
        AddCommentRequest, Comment, Conversation, ConversationsResponse,
        CreateConversationRequest, CreateDiscussionRequest, CreatePollRequest, CreatePostRequest,
        CreateReplyRequest, CurrentUser, DeliveryStatus, Discussion, DiscussionReply,
        DiscussionsResponse, LastMessage, Message, Pagination, Poll, PollOption, Post,
        PostsResponse, SendMessageRequest, SyncUserRequest, UpdatePostRequest, UserSearchResponse,
        UserSummary,
    },
    service::{DiscussionService, MessagingService, PostService, UserDirectory},
};

/// Display name given to records created by the caller
const CURRENT_USER_NAME: &str = "Current User";

/// Display name given to participants of a new conversation
const PARTICIPANT_NAME: &str = "User";

/// Last-message text of a conversation started without a message
const CONVERSATION_STARTED: &str = "Conversation started";

/// Page size reported for the conversation list
const CONVERSATIONS_LIMIT: u32 = 50;

/// Fixture-backed community service
#[derive(Debug, Clone)]
pub struct MockCommunityService {
    latency: Latency,
    fallback_user_id: Option<String>,
    anchor: DateTime<Utc>,
}

impl MockCommunityService {
    /// Create a service whose fixtures are anchored at the current time
    pub fn new(config: &CommunityConfig) -> Self {
        Self::with_anchor(config, Utc::now())
    }

    /// Create a service whose fixture timestamps are relative to `anchor`
    pub fn with_anchor(config: &CommunityConfig, anchor: DateTime<Utc>) -> Self {
        Self {
            latency: Latency::new(config.delay()),
            fallback_user_id: config.fallback_user_id.clone(),
            anchor,
        }
    }

    /// Time the fixtures are relative to
    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    fn acting_user(&self, ctx: &RequestContext) -> CommunityResult<String> {
        ctx.resolve_user_id(self.fallback_user_id.as_deref())
    }

    fn build_post(&self, ctx: &RequestContext, request: CreatePostRequest) -> CommunityResult<Post> {
        let user_id = self.acting_user(ctx)?;
        let now = Utc::now();

        Ok(Post {
            id: generate_id(now),
            author: UserSummary::named(user_id.clone(), CURRENT_USER_NAME),
            user_id,
            content: request.content,
            post_type: request.post_type,
            created_at: now,
            updated_at: now,
            likes: 0,
            comments: 0,
            shares: 0,
            hashtags: request.hashtags.unwrap_or_default(),
            has_liked: false,
            is_public: request.is_public.unwrap_or(true),
            category: request.category,
            image_url: request.image_url,
            image_caption: request.image_caption,
            poll: request.poll.map(build_poll),
        })
    }

    fn build_discussion(
        &self,
        ctx: &RequestContext,
        request: CreateDiscussionRequest,
    ) -> CommunityResult<Discussion> {
        let user_id = self.acting_user(ctx)?;
        let now = Utc::now();

        Ok(Discussion {
            id: generate_id(now),
            title: request.title,
            content: request.content,
            category: request.category,
            author: UserSummary::named(user_id, CURRENT_USER_NAME),
            created_at: now,
            updated_at: now,
            replies: 0,
            views: 0,
            last_reply: None,
            is_pinned: false,
            is_solved: false,
            is_scholarly: false,
            tags: request.tags.unwrap_or_default(),
        })
    }

    fn build_message(
        &self,
        ctx: &RequestContext,
        request: SendMessageRequest,
    ) -> CommunityResult<Message> {
        let sender_id = self.acting_user(ctx)?;
        let now = Utc::now();

        Ok(Message {
            id: generate_id(now),
            sender_id,
            receiver_id: request.receiver_id.unwrap_or_default(),
            content: request.content,
            created_at: now,
            is_read: false,
            message_type: request.message_type.unwrap_or_default(),
            media_url: request.media_url,
            media_caption: request.media_caption,
            media_duration: request.media_duration,
            media_size: request.media_size,
            media_file_name: request.media_file_name,
            media_mime_type: request.media_mime_type,
            delivery_status: DeliveryStatus::Sent,
            reply_to_message_id: request.reply_to_message_id,
        })
    }

    fn build_conversation(
        &self,
        ctx: &RequestContext,
        request: CreateConversationRequest,
    ) -> CommunityResult<Conversation> {
        let user_id = self.acting_user(ctx)?;
        let now = Utc::now();

        Ok(Conversation {
            id: generate_id(now),
            participants: request
                .participant_ids
                .into_iter()
                .map(|id| UserSummary::named(id, PARTICIPANT_NAME))
                .collect(),
            last_message: Some(LastMessage {
                content: request
                    .initial_message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| CONVERSATION_STARTED.to_string()),
                timestamp: now,
                sender_id: user_id,
            }),
            unread_count: 0,
            updated_at: now,
        })
    }
}

/// Ids of synthesized records are the creation time in milliseconds
fn generate_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}

/// Expand a poll definition into viewer-facing options `opt1..optN`
fn build_poll(request: CreatePollRequest) -> Poll {
    Poll {
        question: request.question,
        options: request
            .options
            .into_iter()
            .enumerate()
            .map(|(index, text)| PollOption {
                id: format!("opt{}", index + 1),
                text,
                votes: 0,
                percentage: 0.0,
                has_voted: false,
            })
            .collect(),
        total_votes: 0,
        allow_multiple_votes: request.allow_multiple_votes.unwrap_or(false),
        expires_at: request.expires_at,
    }
}

fn not_implemented<T>(operation: &str) -> ApiResponse<T> {
    debug!("Mock: {} is not implemented", operation);
    ApiResponse::err(NOT_IMPLEMENTED_MESSAGE)
}

#[async_trait]
impl PostService for MockCommunityService {
    async fn list_posts(
        &self,
        _ctx: &RequestContext,
        page: u32,
        limit: u32,
    ) -> ApiResponse<PostsResponse> {
        self.latency.simulate().await;

        let posts = fixtures::posts(self.anchor);
        let pagination = Pagination::single_page(page, limit, posts.len());
        ApiResponse::ok(PostsResponse { posts, pagination })
    }

    async fn create_post(
        &self,
        ctx: &RequestContext,
        request: CreatePostRequest,
    ) -> ApiResponse<Post> {
        self.latency.simulate().await;
        ApiResponse::from_result(self.build_post(ctx, request), "Failed to create post")
    }

    async fn like_post(&self, _ctx: &RequestContext, post_id: &str) -> ApiResponse<()> {
        self.latency.simulate().await;
        info!("Mock: Liked post {}", post_id);
        ApiResponse::ok(())
    }

    async fn unlike_post(&self, _ctx: &RequestContext, post_id: &str) -> ApiResponse<()> {
        self.latency.simulate().await;
        info!("Mock: Unliked post {}", post_id);
        ApiResponse::ok(())
    }

    async fn vote_on_poll(
        &self,
        _ctx: &RequestContext,
        post_id: &str,
        option_id: &str,
    ) -> ApiResponse<()> {
        self.latency.simulate().await;
        info!("Mock: Voted on poll {} option {}", post_id, option_id);
        ApiResponse::ok(())
    }

    async fn update_post(
        &self,
        _ctx: &RequestContext,
        _post_id: &str,
        _request: UpdatePostRequest,
    ) -> ApiResponse<Post> {
        not_implemented("update_post")
    }

    async fn delete_post(&self, _ctx: &RequestContext, _post_id: &str) -> ApiResponse<()> {
        not_implemented("delete_post")
    }

    async fn get_post_comments(
        &self,
        _ctx: &RequestContext,
        _post_id: &str,
    ) -> ApiResponse<Vec<Comment>> {
        not_implemented("get_post_comments")
    }

    async fn add_comment(
        &self,
        _ctx: &RequestContext,
        _post_id: &str,
        _request: AddCommentRequest,
    ) -> ApiResponse<Comment> {
        not_implemented("add_comment")
    }
}

#[async_trait]
impl DiscussionService for MockCommunityService {
    async fn list_discussions(
        &self,
        _ctx: &RequestContext,
        page: u32,
        limit: u32,
        category: Option<&str>,
    ) -> ApiResponse<DiscussionsResponse> {
        self.latency.simulate().await;

        if let Some(category) = category {
            debug!("Mock: category filter {:?} is not applied", category);
        }

        let discussions = fixtures::discussions(self.anchor);
        let pagination = Pagination::single_page(page, limit, discussions.len());
        ApiResponse::ok(DiscussionsResponse {
            discussions,
            pagination,
        })
    }

    async fn create_discussion(
        &self,
        ctx: &RequestContext,
        request: CreateDiscussionRequest,
    ) -> ApiResponse<Discussion> {
        self.latency.simulate().await;
        ApiResponse::from_result(
            self.build_discussion(ctx, request),
            "Failed to create discussion",
        )
    }

    async fn reply_to_discussion(
        &self,
        _ctx: &RequestContext,
        request: CreateReplyRequest,
    ) -> ApiResponse<()> {
        self.latency.simulate().await;
        info!(
            "Mock: Reply created for discussion {}",
            request.discussion_id
        );
        ApiResponse::ok(())
    }

    async fn list_discussion_replies(
        &self,
        _ctx: &RequestContext,
        discussion_id: &str,
    ) -> ApiResponse<Vec<DiscussionReply>> {
        self.latency.simulate().await;
        ApiResponse::ok(fixtures::discussion_replies(self.anchor, discussion_id))
    }

    async fn get_discussion(
        &self,
        _ctx: &RequestContext,
        _discussion_id: &str,
    ) -> ApiResponse<Discussion> {
        not_implemented("get_discussion")
    }
}

#[async_trait]
impl MessagingService for MockCommunityService {
    async fn list_conversations(&self, _ctx: &RequestContext) -> ApiResponse<ConversationsResponse> {
        self.latency.simulate().await;

        let conversations = fixtures::conversations(self.anchor);
        let pagination = Pagination::single_page(1, CONVERSATIONS_LIMIT, conversations.len());
        ApiResponse::ok(ConversationsResponse {
            conversations,
            pagination,
        })
    }

    async fn list_messages(
        &self,
        _ctx: &RequestContext,
        _conversation_id: &str,
    ) -> ApiResponse<Vec<Message>> {
        self.latency.simulate().await;
        ApiResponse::ok(fixtures::messages(self.anchor))
    }

    async fn send_message(
        &self,
        ctx: &RequestContext,
        request: SendMessageRequest,
    ) -> ApiResponse<Message> {
        self.latency.simulate().await;
        ApiResponse::from_result(self.build_message(ctx, request), "Failed to send message")
    }

    async fn mark_message_read(&self, _ctx: &RequestContext, message_id: &str) -> ApiResponse<()> {
        self.latency.simulate().await;
        info!("Mock: Message marked as read {}", message_id);
        ApiResponse::ok(())
    }

    async fn mark_conversation_read(
        &self,
        _ctx: &RequestContext,
        conversation_id: &str,
    ) -> ApiResponse<()> {
        self.latency.simulate().await;
        info!("Mock: Conversation marked as read {}", conversation_id);
        ApiResponse::ok(())
    }

    async fn create_conversation(
        &self,
        ctx: &RequestContext,
        request: CreateConversationRequest,
    ) -> ApiResponse<Conversation> {
        self.latency.simulate().await;
        ApiResponse::from_result(
            self.build_conversation(ctx, request),
            "Failed to create conversation",
        )
    }

    async fn delete_conversation(
        &self,
        _ctx: &RequestContext,
        conversation_id: &str,
    ) -> ApiResponse<()> {
        self.latency.simulate().await;
        info!("Mock: Conversation deleted {}", conversation_id);
        ApiResponse::ok(())
    }
}

#[async_trait]
impl UserDirectory for MockCommunityService {
    async fn search_users(
        &self,
        _ctx: &RequestContext,
        query: &str,
        page: u32,
        limit: u32,
    ) -> ApiResponse<UserSearchResponse> {
        self.latency.simulate().await;

        let needle = query.to_lowercase();
        let users: Vec<UserSummary> = fixtures::users(self.anchor)
            .into_iter()
            .filter(|user| user.name.to_lowercase().contains(&needle))
            .collect();

        let pagination = Pagination::single_page(page, limit, users.len());
        ApiResponse::ok(UserSearchResponse { users, pagination })
    }

    async fn sync_user(&self, _ctx: &RequestContext, profile: SyncUserRequest) -> ApiResponse<()> {
        info!("Mock: User synced {}", profile.id);
        ApiResponse::ok(())
    }

    async fn current_user(&self, ctx: &RequestContext) -> ApiResponse<CurrentUser> {
        ApiResponse::from_result(
            self.acting_user(ctx).map(|user_id| CurrentUser { user_id }),
            "Failed to resolve current user",
        )
    }
}
