//! API service routes
//!
//! Every community route answers 200 with the operation's envelope as the
//! body; callers branch on `success`.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use common::{ApiResponse, RequestContext};
use community::{
    DiscussionService, MessagingService, PostService, UserDirectory,
    models::{
        AddCommentRequest, Comment, Conversation, ConversationsResponse,
        CreateConversationRequest, CreateDiscussionRequest, CreatePostRequest, CreateReplyRequest,
        CurrentUser, Discussion, DiscussionReply, DiscussionsResponse, Message, PollVoteRequest,
        Post, PostsResponse, SendMessageRequest, SyncUserRequest, UpdatePostRequest,
        UserSearchResponse,
    },
    service::{DEFAULT_LIMIT, DEFAULT_PAGE, DEFAULT_SEARCH_LIMIT},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    extract::{JsonBody, QueryParams},
    middleware::identity_middleware,
    state::AppState,
};

/// Query parameters for paginated listings
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
    /// Discussion category; accepted but not applied by the fixture service
    pub category: Option<String>,
}

/// Query parameters for user search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

type Envelope<T> = Json<ApiResponse<T>>;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", put(update_post).delete(delete_post))
        .route("/posts/:id/like", post(like_post).delete(unlike_post))
        .route("/posts/:id/poll/votes", post(vote_on_poll))
        .route(
            "/posts/:id/comments",
            get(get_post_comments).post(add_comment),
        )
        .route(
            "/discussions",
            get(list_discussions).post(create_discussion),
        )
        .route("/discussions/:id", get(get_discussion))
        .route(
            "/discussions/:id/replies",
            get(list_discussion_replies).post(reply_to_discussion),
        )
        .route(
            "/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route("/conversations/:id", delete(delete_conversation))
        .route("/conversations/:id/messages", get(list_messages))
        .route("/conversations/:id/read", post(mark_conversation_read))
        .route("/messages", post(send_message))
        .route("/messages/:id/read", post(mark_message_read))
        .route("/users/search", get(search_users))
        .route("/users/sync", post(sync_user))
        .route("/users/me", get(current_user))
        .layer(middleware::from_fn(identity_middleware))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "community-api"
    }))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    QueryParams(query): QueryParams<PageQuery>,
) -> Envelope<PostsResponse> {
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Json(state.community.list_posts(&ctx, page, limit).await)
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    JsonBody(payload): JsonBody<CreatePostRequest>,
) -> Envelope<Post> {
    Json(state.community.create_post(&ctx, payload).await)
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdatePostRequest>,
) -> Envelope<Post> {
    Json(state.community.update_post(&ctx, &id, payload).await)
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<()> {
    Json(state.community.delete_post(&ctx, &id).await)
}

pub async fn like_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<()> {
    Json(state.community.like_post(&ctx, &id).await)
}

pub async fn unlike_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<()> {
    Json(state.community.unlike_post(&ctx, &id).await)
}

pub async fn vote_on_poll(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<PollVoteRequest>,
) -> Envelope<()> {
    Json(
        state
            .community
            .vote_on_poll(&ctx, &id, &payload.option_id)
            .await,
    )
}

pub async fn get_post_comments(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<Vec<Comment>> {
    Json(state.community.get_post_comments(&ctx, &id).await)
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<AddCommentRequest>,
) -> Envelope<Comment> {
    Json(state.community.add_comment(&ctx, &id, payload).await)
}

pub async fn list_discussions(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    QueryParams(query): QueryParams<PageQuery>,
) -> Envelope<DiscussionsResponse> {
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Json(
        state
            .community
            .list_discussions(&ctx, page, limit, query.category.as_deref())
            .await,
    )
}

pub async fn create_discussion(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    JsonBody(payload): JsonBody<CreateDiscussionRequest>,
) -> Envelope<Discussion> {
    Json(state.community.create_discussion(&ctx, payload).await)
}

pub async fn get_discussion(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<Discussion> {
    Json(state.community.get_discussion(&ctx, &id).await)
}

pub async fn list_discussion_replies(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<Vec<DiscussionReply>> {
    Json(state.community.list_discussion_replies(&ctx, &id).await)
}

/// Reply to a discussion; the path id wins over the body
pub async fn reply_to_discussion(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    JsonBody(mut payload): JsonBody<CreateReplyRequest>,
) -> Envelope<()> {
    payload.discussion_id = id;
    Json(state.community.reply_to_discussion(&ctx, payload).await)
}

pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Envelope<ConversationsResponse> {
    Json(state.community.list_conversations(&ctx).await)
}

pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    JsonBody(payload): JsonBody<CreateConversationRequest>,
) -> Envelope<Conversation> {
    Json(state.community.create_conversation(&ctx, payload).await)
}

pub async fn delete_conversation(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<()> {
    Json(state.community.delete_conversation(&ctx, &id).await)
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<Vec<Message>> {
    Json(state.community.list_messages(&ctx, &id).await)
}

pub async fn mark_conversation_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<()> {
    Json(state.community.mark_conversation_read(&ctx, &id).await)
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    JsonBody(payload): JsonBody<SendMessageRequest>,
) -> Envelope<Message> {
    Json(state.community.send_message(&ctx, payload).await)
}

pub async fn mark_message_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Envelope<()> {
    Json(state.community.mark_message_read(&ctx, &id).await)
}

pub async fn search_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> Envelope<UserSearchResponse> {
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    Json(
        state
            .community
            .search_users(&ctx, &query.query, page, limit)
            .await,
    )
}

pub async fn sync_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    JsonBody(payload): JsonBody<SyncUserRequest>,
) -> Envelope<()> {
    Json(state.community.sync_user(&ctx, payload).await)
}

pub async fn current_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Envelope<CurrentUser> {
    Json(state.community.current_user(&ctx).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::CommunityConfig;
    use community::{
        HttpCommunityService, MockCommunityService,
        models::{MessageType, PostType},
    };
    use std::sync::Arc;
    use tokio::net::TcpListener;

    /// Serve `service` on an ephemeral port and return its base URL
    async fn serve(service: MockCommunityService) -> String {
        let app = create_router(AppState::new(Arc::new(service)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> HttpCommunityService {
        HttpCommunityService::new(&CommunityConfig {
            base_url: base_url.to_string(),
            ..CommunityConfig::without_delay()
        })
        .expect("valid base URL")
    }

    fn strict_config() -> CommunityConfig {
        CommunityConfig {
            fallback_user_id: None,
            ..CommunityConfig::without_delay()
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let base_url = serve(MockCommunityService::new(&CommunityConfig::without_delay())).await;
        let body: serde_json::Value = reqwest::get(format!("{}/health", base_url))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_reads_over_http_match_in_process_service() {
        let anchor = Utc::now();
        let local = MockCommunityService::with_anchor(&CommunityConfig::without_delay(), anchor);
        let remote = client(&serve(local.clone()).await);
        let ctx = RequestContext::anonymous();

        assert_eq!(
            remote.list_posts(&ctx, 2, 5).await,
            local.list_posts(&ctx, 2, 5).await
        );
        assert_eq!(
            remote
                .list_discussions(&ctx, 1, 10, Some("Book Study & Reflection"))
                .await,
            local.list_discussions(&ctx, 1, 10, None).await
        );
        assert_eq!(
            remote.list_discussion_replies(&ctx, "a/b").await,
            local.list_discussion_replies(&ctx, "a/b").await
        );
        assert_eq!(
            remote.list_conversations(&ctx).await,
            local.list_conversations(&ctx).await
        );
        assert_eq!(
            remote.list_messages(&ctx, "1").await,
            local.list_messages(&ctx, "1").await
        );
        assert_eq!(
            remote.search_users(&ctx, "ahmad", 1, 20).await,
            local.search_users(&ctx, "ahmad", 1, 20).await
        );
    }

    #[tokio::test]
    async fn test_identity_header_reaches_the_service() {
        let remote = client(&serve(MockCommunityService::new(&strict_config())).await);

        let ctx = RequestContext::authenticated("user42");
        let post = remote
            .create_post(&ctx, CreatePostRequest::new("hello", PostType::Moment))
            .await
            .into_result()
            .expect("post should be created");
        assert_eq!(post.user_id, "user42");

        let me = remote.current_user(&ctx).await;
        assert_eq!(
            me,
            ApiResponse::ok(CurrentUser {
                user_id: "user42".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_missing_identity_is_reported_in_envelope() {
        let remote = client(&serve(MockCommunityService::new(&strict_config())).await);
        let ctx = RequestContext::anonymous();

        let response = remote
            .create_post(&ctx, CreatePostRequest::new("hello", PostType::Moment))
            .await;
        assert_eq!(response, ApiResponse::err("User not authenticated"));
    }

    #[tokio::test]
    async fn test_acknowledgements_and_stubs_over_http() {
        let remote = client(&serve(MockCommunityService::new(&CommunityConfig::without_delay())).await);
        let ctx = RequestContext::authenticated("user1");

        assert_eq!(remote.like_post(&ctx, "1").await, ApiResponse::ok(()));
        assert_eq!(remote.unlike_post(&ctx, "1").await, ApiResponse::ok(()));
        assert_eq!(
            remote.vote_on_poll(&ctx, "3", "opt2").await,
            ApiResponse::ok(())
        );
        assert_eq!(
            remote.mark_conversation_read(&ctx, "1").await,
            ApiResponse::ok(())
        );
        assert_eq!(
            remote.delete_conversation(&ctx, "1").await,
            ApiResponse::ok(())
        );
        assert_eq!(
            remote
                .reply_to_discussion(
                    &ctx,
                    CreateReplyRequest {
                        discussion_id: "2".to_string(),
                        content: "Agreed".to_string(),
                        parent_reply_id: Some("1".to_string()),
                    },
                )
                .await,
            ApiResponse::ok(())
        );

        let not_implemented = Some("Not implemented");
        assert_eq!(
            remote.delete_post(&ctx, "1").await.error.as_deref(),
            not_implemented
        );
        assert_eq!(
            remote.get_discussion(&ctx, "1").await.error.as_deref(),
            not_implemented
        );
        assert_eq!(
            remote.get_post_comments(&ctx, "1").await.error.as_deref(),
            not_implemented
        );
    }

    #[tokio::test]
    async fn test_writes_over_http_match_in_process_service() {
        let local = MockCommunityService::new(&strict_config());
        let remote = client(&serve(local.clone()).await);
        let ctx = RequestContext::authenticated("user1");

        let message_request = SendMessageRequest {
            receiver_id: Some("user2".to_string()),
            content: "Listen to this".to_string(),
            message_type: Some(MessageType::Audio),
            media_url: Some("https://cdn.example.com/a.m4a".to_string()),
            media_duration: Some(42),
            media_size: Some(123_456),
            media_mime_type: Some("audio/mp4".to_string()),
            reply_to_message_id: Some("2".to_string()),
            ..Default::default()
        };
        let mut sent = remote
            .send_message(&ctx, message_request.clone())
            .await
            .into_result()
            .expect("message should be sent");
        let expected = local
            .send_message(&ctx, message_request)
            .await
            .into_result()
            .unwrap();
        sent.id = expected.id.clone();
        sent.created_at = expected.created_at;
        assert_eq!(sent, expected);
        assert_eq!(sent.sender_id, "user1");
        assert_eq!(sent.media_size, Some(123_456));

        let conversation_request = CreateConversationRequest {
            participant_ids: vec!["user5".to_string(), "user6".to_string()],
            initial_message: Some("Salam".to_string()),
        };
        let mut created = remote
            .create_conversation(&ctx, conversation_request.clone())
            .await
            .into_result()
            .expect("conversation should be created");
        let expected = local
            .create_conversation(&ctx, conversation_request)
            .await
            .into_result()
            .unwrap();
        created.id = expected.id.clone();
        created.updated_at = expected.updated_at;
        if let (Some(actual), Some(wanted)) = (&mut created.last_message, &expected.last_message) {
            actual.timestamp = wanted.timestamp;
        }
        assert_eq!(created, expected);
        assert_eq!(created.participants.len(), 2);

        let discussion_request = CreateDiscussionRequest {
            title: "Tafsir circles".to_string(),
            content: "Who is joining?".to_string(),
            category: "Study Groups".to_string(),
            tags: Some(vec!["tafsir".to_string()]),
        };
        let mut discussion = remote
            .create_discussion(&ctx, discussion_request.clone())
            .await
            .into_result()
            .expect("discussion should be created");
        let expected = local
            .create_discussion(&ctx, discussion_request)
            .await
            .into_result()
            .unwrap();
        discussion.id = expected.id.clone();
        discussion.created_at = expected.created_at;
        discussion.updated_at = expected.updated_at;
        assert_eq!(discussion, expected);

        assert_eq!(
            remote.mark_message_read(&ctx, "a/b").await,
            ApiResponse::ok(())
        );
        assert_eq!(
            remote
                .sync_user(
                    &ctx,
                    SyncUserRequest {
                        id: "idp_123".to_string(),
                        email: Some("user@example.com".to_string()),
                        name: Some("User".to_string()),
                        avatar: None,
                    },
                )
                .await,
            ApiResponse::ok(())
        );

        let not_implemented = Some("Not implemented");
        let update = UpdatePostRequest {
            content: Some("edited".to_string()),
            ..Default::default()
        };
        assert_eq!(
            remote.update_post(&ctx, "1", update).await.error.as_deref(),
            not_implemented
        );
        let comment = AddCommentRequest {
            content: "Beautiful".to_string(),
            parent_comment_id: None,
        };
        assert_eq!(
            remote.add_comment(&ctx, "1", comment).await.error.as_deref(),
            not_implemented
        );
    }

    #[tokio::test]
    async fn test_rejected_requests_answer_with_envelope() {
        let base_url = serve(MockCommunityService::new(&CommunityConfig::without_delay())).await;
        let http = reqwest::Client::new();

        let missing_field = http
            .post(format!("{}/posts", base_url))
            .json(&serde_json::json!({"content": "x"}))
            .send()
            .await
            .unwrap();
        assert_eq!(
            missing_field.status(),
            reqwest::StatusCode::UNPROCESSABLE_ENTITY
        );
        let body: ApiResponse<serde_json::Value> = missing_field.json().await.unwrap();
        assert!(!body.success);
        assert!(body.data.is_none());
        assert!(!body.error.unwrap_or_default().is_empty());

        let not_json = http
            .post(format!("{}/messages", base_url))
            .body("hello")
            .send()
            .await
            .unwrap();
        assert_eq!(
            not_json.status(),
            reqwest::StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        let body: ApiResponse<serde_json::Value> = not_json.json().await.unwrap();
        assert!(!body.success);

        let bad_page = http
            .get(format!("{}/posts?page=abc", base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(bad_page.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: ApiResponse<serde_json::Value> = bad_page.json().await.unwrap();
        assert!(!body.success);
        assert!(body.error.is_some());
    }

    #[tokio::test]
    async fn test_invalid_identity_header_is_rejected() {
        let base_url = serve(MockCommunityService::new(&CommunityConfig::without_delay())).await;

        let response = reqwest::Client::new()
            .get(format!("{}/posts", base_url))
            .header(
                common::context::USER_ID_HEADER,
                reqwest::header::HeaderValue::from_bytes(&[0xFF, 0xFE]).unwrap(),
            )
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: ApiResponse<serde_json::Value> = response.json().await.unwrap();
        assert!(!body.success);
        assert!(body.error.is_some());
    }
}
