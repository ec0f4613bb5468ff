//! HTTP client implementation of the community service
//!
//! Talks to a backend exposing the routes of the `api` service. Responses are
//! envelopes; transport and decoding faults are folded into failed envelopes
//! the same way the fixture service reports its own faults.

use async_trait::async_trait;
use common::{
    ApiResponse, CommunityConfig, CommunityError, CommunityResult, RequestContext,
    context::USER_ID_HEADER, error::ConfigError,
};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    models::{
        AddCommentRequest, Comment, Conversation, ConversationsResponse,
        CreateConversationRequest, CreateDiscussionRequest, CreatePostRequest, CreateReplyRequest,
        CurrentUser, Discussion, DiscussionReply, DiscussionsResponse, Message, PollVoteRequest,
        Post, PostsResponse, SendMessageRequest, SyncUserRequest, UpdatePostRequest,
        UserSearchResponse,
    },
    service::{DiscussionService, MessagingService, PostService, UserDirectory},
};

/// Community service backed by a remote HTTP backend
#[derive(Debug, Clone)]
pub struct HttpCommunityService {
    client: Client,
    base_url: Url,
}

impl HttpCommunityService {
    /// Create a client for the backend configured in `config`
    pub fn new(config: &CommunityConfig) -> Result<Self, ConfigError> {
        Self::with_client(Client::new(), &config.base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::Invalid {
            key: "base_url".to_string(),
            message: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "base_url".to_string(),
                message: format!("{} cannot be used as a base URL", base_url),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Build a URL from percent-encoded path segments
    fn url(&self, segments: &[&str]) -> CommunityResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CommunityError::Unexpected("Invalid base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        ctx: &RequestContext,
        method: Method,
        segments: &[&str],
    ) -> CommunityResult<RequestBuilder> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(user_id) = ctx.user_id() {
            request = request.header(USER_ID_HEADER, user_id);
        }
        Ok(request)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> CommunityResult<T> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
            Ok(raw) => raw.decode::<T>()?.into_result(),
            Err(_) if !status.is_success() => Err(CommunityError::Transport(format!(
                "Backend responded with {}: {}",
                status,
                body.trim()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
        query: &[(&str, String)],
        fallback: &str,
    ) -> ApiResponse<T> {
        let result = match self.request(ctx, Method::GET, segments) {
            Ok(request) => self.execute(request.query(query)).await,
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, fallback)
    }

    async fn send<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        fallback: &str,
    ) -> ApiResponse<T> {
        let result = match self.request(ctx, method, segments) {
            Ok(request) => {
                let request = match body {
                    Some(body) => request.json(body),
                    None => request,
                };
                self.execute(request).await
            }
            Err(e) => Err(e),
        };
        ApiResponse::from_result(result, fallback)
    }
}

fn transport(e: reqwest::Error) -> CommunityError {
    CommunityError::Transport(e.to_string())
}

fn page_query(page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("limit", limit.to_string())]
}

/// Body type for requests that carry none
const NO_BODY: Option<&()> = None;

#[async_trait]
impl PostService for HttpCommunityService {
    async fn list_posts(
        &self,
        ctx: &RequestContext,
        page: u32,
        limit: u32,
    ) -> ApiResponse<PostsResponse> {
        self.get(ctx, &["posts"], &page_query(page, limit), "Failed to get posts")
            .await
    }

    async fn create_post(
        &self,
        ctx: &RequestContext,
        request: CreatePostRequest,
    ) -> ApiResponse<Post> {
        self.send(ctx, Method::POST, &["posts"], Some(&request), "Failed to create post")
            .await
    }

    async fn like_post(&self, ctx: &RequestContext, post_id: &str) -> ApiResponse<()> {
        self.send(
            ctx,
            Method::POST,
            &["posts", post_id, "like"],
            NO_BODY,
            "Failed to like post",
        )
        .await
    }

    async fn unlike_post(&self, ctx: &RequestContext, post_id: &str) -> ApiResponse<()> {
        self.send(
            ctx,
            Method::DELETE,
            &["posts", post_id, "like"],
            NO_BODY,
            "Failed to unlike post",
        )
        .await
    }

    async fn vote_on_poll(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        option_id: &str,
    ) -> ApiResponse<()> {
        let body = PollVoteRequest {
            option_id: option_id.to_string(),
        };
        self.send(
            ctx,
            Method::POST,
            &["posts", post_id, "poll", "votes"],
            Some(&body),
            "Failed to vote on poll",
        )
        .await
    }

    async fn update_post(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        request: UpdatePostRequest,
    ) -> ApiResponse<Post> {
        self.send(
            ctx,
            Method::PUT,
            &["posts", post_id],
            Some(&request),
            "Failed to update post",
        )
        .await
    }

    async fn delete_post(&self, ctx: &RequestContext, post_id: &str) -> ApiResponse<()> {
        self.send(
            ctx,
            Method::DELETE,
            &["posts", post_id],
            NO_BODY,
            "Failed to delete post",
        )
        .await
    }

    async fn get_post_comments(
        &self,
        ctx: &RequestContext,
        post_id: &str,
    ) -> ApiResponse<Vec<Comment>> {
        self.get(
            ctx,
            &["posts", post_id, "comments"],
            &[],
            "Failed to get comments",
        )
        .await
    }

    async fn add_comment(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        request: AddCommentRequest,
    ) -> ApiResponse<Comment> {
        self.send(
            ctx,
            Method::POST,
            &["posts", post_id, "comments"],
            Some(&request),
            "Failed to add comment",
        )
        .await
    }
}

#[async_trait]
impl DiscussionService for HttpCommunityService {
    async fn list_discussions(
        &self,
        ctx: &RequestContext,
        page: u32,
        limit: u32,
        category: Option<&str>,
    ) -> ApiResponse<DiscussionsResponse> {
        let mut query = page_query(page, limit);
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        self.get(ctx, &["discussions"], &query, "Failed to get discussions")
            .await
    }

    async fn create_discussion(
        &self,
        ctx: &RequestContext,
        request: CreateDiscussionRequest,
    ) -> ApiResponse<Discussion> {
        self.send(
            ctx,
            Method::POST,
            &["discussions"],
            Some(&request),
            "Failed to create discussion",
        )
        .await
    }

    async fn reply_to_discussion(
        &self,
        ctx: &RequestContext,
        request: CreateReplyRequest,
    ) -> ApiResponse<()> {
        let discussion_id = request.discussion_id.clone();
        self.send(
            ctx,
            Method::POST,
            &["discussions", discussion_id.as_str(), "replies"],
            Some(&request),
            "Failed to reply to discussion",
        )
        .await
    }

    async fn list_discussion_replies(
        &self,
        ctx: &RequestContext,
        discussion_id: &str,
    ) -> ApiResponse<Vec<DiscussionReply>> {
        self.get(
            ctx,
            &["discussions", discussion_id, "replies"],
            &[],
            "Failed to get discussion replies",
        )
        .await
    }

    async fn get_discussion(
        &self,
        ctx: &RequestContext,
        discussion_id: &str,
    ) -> ApiResponse<Discussion> {
        self.get(
            ctx,
            &["discussions", discussion_id],
            &[],
            "Failed to get discussion",
        )
        .await
    }
}

#[async_trait]
impl MessagingService for HttpCommunityService {
    async fn list_conversations(&self, ctx: &RequestContext) -> ApiResponse<ConversationsResponse> {
        self.get(ctx, &["conversations"], &[], "Failed to get conversations")
            .await
    }

    async fn list_messages(
        &self,
        ctx: &RequestContext,
        conversation_id: &str,
    ) -> ApiResponse<Vec<Message>> {
        self.get(
            ctx,
            &["conversations", conversation_id, "messages"],
            &[],
            "Failed to get messages",
        )
        .await
    }

    async fn send_message(
        &self,
        ctx: &RequestContext,
        request: SendMessageRequest,
    ) -> ApiResponse<Message> {
        self.send(
            ctx,
            Method::POST,
            &["messages"],
            Some(&request),
            "Failed to send message",
        )
        .await
    }

    async fn mark_message_read(&self, ctx: &RequestContext, message_id: &str) -> ApiResponse<()> {
        self.send(
            ctx,
            Method::POST,
            &["messages", message_id, "read"],
            NO_BODY,
            "Failed to mark message as read",
        )
        .await
    }

    async fn mark_conversation_read(
        &self,
        ctx: &RequestContext,
        conversation_id: &str,
    ) -> ApiResponse<()> {
        self.send(
            ctx,
            Method::POST,
            &["conversations", conversation_id, "read"],
            NO_BODY,
            "Failed to mark conversation as read",
        )
        .await
    }

    async fn create_conversation(
        &self,
        ctx: &RequestContext,
        request: CreateConversationRequest,
    ) -> ApiResponse<Conversation> {
        self.send(
            ctx,
            Method::POST,
            &["conversations"],
            Some(&request),
            "Failed to create conversation",
        )
        .await
    }

    async fn delete_conversation(
        &self,
        ctx: &RequestContext,
        conversation_id: &str,
    ) -> ApiResponse<()> {
        self.send(
            ctx,
            Method::DELETE,
            &["conversations", conversation_id],
            NO_BODY,
            "Failed to delete conversation",
        )
        .await
    }
}

#[async_trait]
impl UserDirectory for HttpCommunityService {
    async fn search_users(
        &self,
        ctx: &RequestContext,
        query: &str,
        page: u32,
        limit: u32,
    ) -> ApiResponse<UserSearchResponse> {
        let mut params = vec![("query", query.to_string())];
        params.extend(page_query(page, limit));
        self.get(ctx, &["users", "search"], &params, "Failed to search users")
            .await
    }

    async fn sync_user(&self, ctx: &RequestContext, profile: SyncUserRequest) -> ApiResponse<()> {
        self.send(
            ctx,
            Method::POST,
            &["users", "sync"],
            Some(&profile),
            "Failed to sync user",
        )
        .await
    }

    async fn current_user(&self, ctx: &RequestContext) -> ApiResponse<CurrentUser> {
        self.get(ctx, &["users", "me"], &[], "Failed to resolve current user")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpCommunityService {
        HttpCommunityService::with_client(Client::new(), base_url).expect("valid base URL")
    }

    #[test]
    fn test_url_percent_encodes_segments() {
        let service = client("http://localhost:3001/api/");
        let url = service.url(&["posts", "a b/c", "like"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/posts/a%20b%2Fc/like");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = HttpCommunityService::with_client(Client::new(), "not a url");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = HttpCommunityService::with_client(Client::new(), "mailto:team@example.org");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_failed_envelope() {
        // Port 9 (discard) is closed on test machines.
        let service = client("http://127.0.0.1:9");
        let response = service
            .list_posts(&RequestContext::anonymous(), 1, 10)
            .await;

        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(!response.error.unwrap_or_default().is_empty());
    }
}
