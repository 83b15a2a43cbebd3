//! API Integration Tests
//!
//! Each test spawns its own server on the in-memory document store, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer, TEST_MAX_FILE_SIZE_MB,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn registered(server: &TestServer, display_name: &str) -> (String, String) {
    let uid = unique_uid();
    let token = server.token(&uid);
    let response = server
        .post_auth("/api/auth/register", &token, &RegisterRequest::named(display_name))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
    (uid, token)
}

async fn create_post(server: &TestServer, token: &str, community: &str) -> String {
    let response = server
        .post_auth("/api/posts", token, &CreatePostRequest::in_community(community))
        .await
        .unwrap();
    let created: CreatedPostResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    created.post_id
}

async fn fetch_post(server: &TestServer, post_id: &str) -> PostBody {
    let response = server.get(&format!("/api/posts/{post_id}")).await.unwrap();
    let detail: PostDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    detail.post
}

async fn karma(server: &TestServer, uid: &str) -> i64 {
    let response = server.get(&format!("/api/users/{uid}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    body["user"]["karma"].as_i64().unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["store"], true);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/posts").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = TestServer::start().await.unwrap();
    let response = server.post("/api/posts", &CreatePostRequest::in_community("memes")).await.unwrap();
    let message = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(message, "No token provided");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let server = TestServer::start().await.unwrap();
    let response = server.get_auth("/api/auth/profile", "not-a-token").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_register_and_profile() {
    let server = TestServer::start().await.unwrap();
    let uid = unique_uid();
    let token = server.token(&uid);

    let response = server.get_auth("/api/auth/profile", &token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .post_auth("/api/auth/register", &token, &RegisterRequest::named("Alice"))
        .await
        .unwrap();
    let registered: RegisterResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(registered.message, "User profile created successfully");
    assert_eq!(registered.user.uid, uid);
    assert_eq!(registered.user.display_name, "Alice");
    assert_eq!(registered.user.karma, 0);
    assert!(registered.user.joined_communities.is_empty());
    assert!(!registered.user.is_admin);
    assert!(!registered.user.is_banned);

    let response = server
        .post_auth("/api/auth/register", &token, &RegisterRequest::default())
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server
        .put_auth("/api/auth/profile", &token, &json!({"bio": "updated"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/api/auth/profile", &token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["user"]["bio"], "updated");
    assert_eq!(body["user"]["displayName"], "Alice");
}

#[tokio::test]
async fn test_register_falls_back_to_token_name() {
    let server = TestServer::start().await.unwrap();
    let uid = unique_uid();
    let token = server.token(&uid);

    let response = server
        .post_auth("/api/auth/register", &token, &RegisterRequest::default())
        .await
        .unwrap();
    let registered: RegisterResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(registered.user.display_name, format!("Tester {uid}"));
}

#[tokio::test]
async fn test_verify_echoes_identity() {
    let server = TestServer::start().await.unwrap();
    let uid = unique_uid();
    let token = server.token(&uid);

    let response = server.post_auth("/api/auth/verify", &token, &json!({})).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"]["uid"], uid.as_str());
    assert_eq!(body["user"]["email"], format!("{uid}@example.com"));
}

// ============================================================================
// Post Tests
// ============================================================================

#[tokio::test]
async fn test_create_post_credits_author() {
    let server = TestServer::start().await.unwrap();
    let (uid, token) = registered(&server, "Poster").await;

    let post_id = create_post(&server, &token, "memes").await;
    let post = fetch_post(&server, &post_id).await;

    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, uid);
    assert_eq!((post.upvotes, post.downvotes, post.score), (1, 0, 1));
    assert_eq!(post.comment_count, 0);
    assert_eq!(post.author.unwrap().display_name, "Poster");
    assert_eq!(karma(&server, &uid).await, 1);
}

#[tokio::test]
async fn test_create_post_requires_title_and_community() {
    let server = TestServer::start().await.unwrap();
    let (_, token) = registered(&server, "Poster").await;

    let response = server
        .post_auth("/api/posts", &token, &json!({"title": "  ", "community": "memes"}))
        .await
        .unwrap();
    let message = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(message, "Title and community are required");
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/posts/404").await.unwrap();
    let message = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(message, "Post not found");
}

#[tokio::test]
async fn test_feed_filters_and_paginates() {
    let server = TestServer::start().await.unwrap();
    let (_, token) = registered(&server, "Poster").await;

    for _ in 0..3 {
        create_post(&server, &token, "memes").await;
    }
    create_post(&server, &token, "dankmemes").await;

    let response = server.get("/api/posts?sort=new&community=memes&limit=2").await.unwrap();
    let page: PostListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.posts.len(), 2);
    assert!(page.posts.iter().all(|p| p.community == "memes"));
    assert_eq!(page.pagination.limit, 2);
    assert!(page.pagination.has_more);

    let response = server.get("/api/posts?sort=new&community=memes&limit=2&page=2").await.unwrap();
    let page: PostListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.posts.len(), 1);
    assert!(!page.pagination.has_more);

    let response = server.get("/api/posts").await.unwrap();
    let page: PostListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.posts.len(), 4);
    assert_eq!(page.pagination.limit, 10);
    assert_eq!(page.pagination.page, 1);
}

#[tokio::test]
async fn test_delete_post_rights() {
    let server = TestServer::start().await.unwrap();
    let (_, author) = registered(&server, "Author").await;
    let (_, other) = registered(&server, "Other").await;
    let post_id = create_post(&server, &author, "memes").await;

    let response = server.delete_auth(&format!("/api/posts/{post_id}"), &other).await.unwrap();
    let message = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(message, "Not authorized to delete this post");

    let response = server.delete_auth(&format!("/api/posts/{post_id}"), &author).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    assert!(fetch_post(&server, &post_id).await.is_deleted);
    let response = server.get("/api/posts").await.unwrap();
    let page: PostListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(page.posts.is_empty());
}

// ============================================================================
// Voting Tests
// ============================================================================

#[tokio::test]
async fn test_vote_transitions() {
    let server = TestServer::start().await.unwrap();
    let (_, author) = registered(&server, "Author").await;
    let (_, voter) = registered(&server, "Voter").await;
    let post_id = create_post(&server, &author, "memes").await;
    let path = format!("/api/posts/{post_id}/vote");

    let response = server.post_auth(&path, &voter, &VoteRequest::new("upvote")).await.unwrap();
    let vote: VoteResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(vote.message, "Vote recorded successfully");
    assert_eq!(vote.new_score, 2);

    let response = server.post_auth(&path, &voter, &VoteRequest::new("upvote")).await.unwrap();
    let vote: VoteResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(vote.new_score, 2);

    let response = server.post_auth(&path, &voter, &VoteRequest::new("downvote")).await.unwrap();
    let vote: VoteResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(vote.new_score, 0);

    let post = fetch_post(&server, &post_id).await;
    assert_eq!((post.upvotes, post.downvotes), (1, 1));

    let response = server.post_auth(&path, &voter, &VoteRequest::new("remove")).await.unwrap();
    let vote: VoteResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(vote.new_score, 1);
}

#[tokio::test]
async fn test_invalid_vote_type() {
    let server = TestServer::start().await.unwrap();
    let (_, voter) = registered(&server, "Voter").await;

    let response = server
        .post_auth("/api/posts/anything/vote", &voter, &VoteRequest::new("sideways"))
        .await
        .unwrap();
    let message = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(message, "Invalid vote type");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_are_all_counted() {
    let server = TestServer::start().await.unwrap();
    let (_, author) = registered(&server, "Author").await;
    let post_id = create_post(&server, &author, "memes").await;

    let mut voters = Vec::new();
    for _ in 0..8 {
        voters.push(registered(&server, "Voter").await.1);
    }

    let url = format!("{}/api/posts/{post_id}/vote", server.base_url());
    let mut votes = tokio::task::JoinSet::new();
    for token in voters {
        let (client, url) = (server.client.clone(), url.clone());
        votes.spawn(async move {
            client
                .post(&url)
                .bearer_auth(token)
                .json(&VoteRequest::new("upvote"))
                .send()
                .await
        });
    }
    while let Some(response) = votes.join_next().await {
        assert_status(response.unwrap().unwrap(), StatusCode::OK).await.unwrap();
    }

    let post = fetch_post(&server, &post_id).await;
    assert_eq!(post.upvotes, 9);
    assert_eq!(post.score, 9);
}

// ============================================================================
// Comment Tests
// ============================================================================

#[tokio::test]
async fn test_comment_thread() {
    let server = TestServer::start().await.unwrap();
    let (uid, token) = registered(&server, "Commenter").await;
    let post_id = create_post(&server, &token, "memes").await;

    let response = server
        .post_auth(
            "/api/comments",
            &token,
            &CreateCommentRequest {
                post_id: post_id.clone(),
                content: "  first  ".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap();
    let top: CreatedCommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            "/api/comments",
            &token,
            &CreateCommentRequest {
                post_id: post_id.clone(),
                content: "reply".to_string(),
                parent_id: Some(top.comment_id.clone()),
            },
        )
        .await
        .unwrap();
    let reply: CreatedCommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server.get(&format!("/api/comments/post/{post_id}")).await.unwrap();
    let thread: CommentListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread.comments.len(), 1);
    let root = &thread.comments[0];
    assert_eq!(root.id, top.comment_id);
    assert_eq!(root.content, "first");
    assert_eq!(root.reply_count, 1);
    let replies = root.replies.as_ref().unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, reply.comment_id);
    assert_eq!(replies[0].parent_id.as_deref(), Some(top.comment_id.as_str()));

    assert_eq!(fetch_post(&server, &post_id).await.comment_count, 2);
    // one post plus two comments
    assert_eq!(karma(&server, &uid).await, 3);

    let response = server.get(&format!("/api/users/{uid}/comments")).await.unwrap();
    let history: CommentListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.comments.len(), 2);
    assert!(history.comments.iter().all(|c| c.post_title.is_some()));
}

#[tokio::test]
async fn test_comment_vote() {
    let server = TestServer::start().await.unwrap();
    let (author_uid, author) = registered(&server, "Author").await;
    let (_, voter) = registered(&server, "Voter").await;
    let post_id = create_post(&server, &author, "memes").await;

    let response = server
        .post_auth(
            "/api/comments",
            &author,
            &CreateCommentRequest {
                post_id,
                content: "vote on me".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap();
    let created: CreatedCommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/api/comments/{}/vote", created.comment_id);

    let response = server.post_auth(&path, &voter, &VoteRequest::new("downvote")).await.unwrap();
    let vote: VoteResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(vote.message, "Vote recorded successfully");
    assert_eq!(vote.new_score, 0);

    let response = server.post_auth(&path, &voter, &VoteRequest::new("upvote")).await.unwrap();
    let vote: VoteResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(vote.new_score, 2);

    let response = server.post_auth(&path, &voter, &VoteRequest::new("sideways")).await.unwrap();
    let message = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(message, "Invalid vote type");

    // votes never move karma
    assert_eq!(karma(&server, &author_uid).await, 2);
}

#[tokio::test]
async fn test_comment_on_missing_targets() {
    let server = TestServer::start().await.unwrap();
    let (_, token) = registered(&server, "Commenter").await;

    let response = server
        .post_auth(
            "/api/comments",
            &token,
            &CreateCommentRequest {
                post_id: "missing".to_string(),
                content: "hello".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap();
    let message = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(message, "Post not found");

    let post_id = create_post(&server, &token, "memes").await;
    let response = server
        .post_auth(
            "/api/comments",
            &token,
            &CreateCommentRequest {
                post_id,
                content: "hello".to_string(),
                parent_id: Some("missing".to_string()),
            },
        )
        .await
        .unwrap();
    let message = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(message, "Parent comment not found");
}

#[tokio::test]
async fn test_comment_edit_and_delete() {
    let server = TestServer::start().await.unwrap();
    let (_, author) = registered(&server, "Author").await;
    let (_, other) = registered(&server, "Other").await;
    let post_id = create_post(&server, &author, "memes").await;

    let response = server
        .post_auth(
            "/api/comments",
            &author,
            &CreateCommentRequest {
                post_id: post_id.clone(),
                content: "orignal".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap();
    let created: CreatedCommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/api/comments/{}", created.comment_id);

    let response = server.put_auth(&path, &other, &json!({"content": "hijacked"})).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.put_auth(&path, &author, &json!({"content": "original"})).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get(&format!("/api/comments/post/{post_id}")).await.unwrap();
    let thread: CommentListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread.comments[0].content, "original");
    assert!(thread.comments[0].is_edited);

    let response = server.delete_auth(&path, &other).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    let response = server.delete_auth(&path, &author).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get(&format!("/api/comments/post/{post_id}")).await.unwrap();
    let thread: CommentListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(thread.comments.is_empty());
}

// ============================================================================
// Community Tests
// ============================================================================

#[tokio::test]
async fn test_community_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let (_, creator) = registered(&server, "Creator").await;
    let (member_uid, member) = registered(&server, "Member").await;

    let request = CreateCommunityRequest::unique();
    let response = server.post_auth("/api/communities", &creator, &request).await.unwrap();
    let created: CreatedCommunityResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created.name, request.name);

    let response = server.post_auth("/api/communities", &creator, &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server
        .get(&format!("/api/communities/{}", request.name.to_uppercase()))
        .await
        .unwrap();
    let detail: CommunityDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.community.id, created.community_id);
    assert_eq!(detail.community.member_count, 1);

    let join = format!("/api/communities/{}/join", created.community_id);
    let response = server.post_empty_auth(&join, &member).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let response = server.post_empty_auth(&join, &member).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server.get_auth("/api/communities/user/joined", &member).await.unwrap();
    let joined: JoinedCommunitiesResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(joined.communities.len(), 1);
    assert_eq!(joined.communities[0].id, created.community_id);
    assert_eq!(joined.communities[0].role, "member");

    let response = server.get(&format!("/api/users/{member_uid}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["user"]["joinedCommunities"], json!([created.community_id]));

    let leave = format!("/api/communities/{}/leave", created.community_id);
    let response = server.post_empty_auth(&leave, &member).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let response = server.post_empty_auth(&leave, &member).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server.get(&format!("/api/communities/{}", request.name)).await.unwrap();
    let detail: CommunityDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail.community.member_count, 1);
}

#[tokio::test]
async fn test_community_name_rules() {
    let server = TestServer::start().await.unwrap();
    let (_, creator) = registered(&server, "Creator").await;

    for name in ["ab", "has space", "this_name_is_far_too_long"] {
        let response = server
            .post_auth(
                "/api/communities",
                &creator,
                &json!({"name": name, "description": "desc"}),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
    }

    let response = server.get("/api/communities/unknown_place").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_user_search() {
    let server = TestServer::start().await.unwrap();
    registered(&server, "Alice").await;
    registered(&server, "Alfred").await;
    registered(&server, "Bob").await;

    let response = server.get("/api/users?q=Al").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let names: Vec<&str> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["displayName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alfred", "Alice"]);

    let response = server.get("/api/users?q=A").await.unwrap();
    let message = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(message, "Search query must be at least 2 characters");
}

#[tokio::test]
async fn test_user_posts_listing() {
    let server = TestServer::start().await.unwrap();
    let (uid, token) = registered(&server, "Poster").await;
    create_post(&server, &token, "memes").await;
    create_post(&server, &token, "memes").await;

    let response = server.get(&format!("/api/users/{uid}/posts")).await.unwrap();
    let page: PostListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.posts.len(), 2);
    assert!(page.posts.iter().all(|p| p.author_id == uid));

    let response = server.get("/api/users/nobody").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let server = TestServer::start().await.unwrap();
    let (_, token) = registered(&server, "Regular").await;

    let response = server.get_auth("/api/admin/stats", &token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.get("/api/admin/stats").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_admin_stats_and_ban() {
    let server = TestServer::start().await.unwrap();
    let admin = server.admin_token("root");
    let (uid, token) = registered(&server, "Troll").await;
    let post_id = create_post(&server, &token, "memes").await;

    let response = server.get_auth("/api/admin/stats", &admin).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["stats"]["totalUsers"], 1);
    assert_eq!(body["stats"]["totalPosts"], 1);

    let response = server
        .post_auth(&format!("/api/admin/users/{uid}/ban"), &admin, &json!({"reason": "spam"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post_auth("/api/posts", &token, &CreatePostRequest::in_community("memes"))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post_auth(&format!("/api/posts/{post_id}/vote"), &token, &VoteRequest::new("upvote"))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.get_auth("/api/admin/users?banned=true", &admin).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["users"][0]["uid"], uid.as_str());
    assert_eq!(body["users"][0]["banReason"], "spam");

    let response = server
        .post_empty_auth(&format!("/api/admin/users/{uid}/unban"), &admin)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    create_post(&server, &token, "memes").await;
}

#[tokio::test]
async fn test_admin_post_moderation() {
    let server = TestServer::start().await.unwrap();
    let admin = server.admin_token("root");
    let (_, token) = registered(&server, "Poster").await;
    let post_id = create_post(&server, &token, "memes").await;

    let response = server
        .post_empty_auth(&format!("/api/admin/posts/{post_id}/feature"), &admin)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get(&format!("/api/posts/{post_id}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["post"]["isFeatured"], true);

    let response = server
        .delete_auth(&format!("/api/admin/posts/{post_id}"), &admin)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    assert!(fetch_post(&server, &post_id).await.is_deleted);

    let response = server.delete_auth("/api/admin/posts/missing", &admin).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_promoted_profile_gets_admin_access() {
    let server = TestServer::start().await.unwrap();
    let root = server.admin_token("root");
    let (uid, token) = registered(&server, "Helper").await;

    let response = server
        .post_empty_auth(&format!("/api/admin/users/{uid}/make-admin"), &root)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/api/admin/stats", &token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post_empty_auth(&format!("/api/admin/users/{uid}/remove-admin"), &root)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/api/admin/stats", &token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Media Tests
// ============================================================================

#[tokio::test]
async fn test_media_upload_is_served() {
    let server = TestServer::start().await.unwrap();
    let (_, token) = registered(&server, "Uploader").await;
    let bytes = vec![0x89, b'P', b'N', b'G', 1, 2, 3];

    let response = server
        .post_bytes_auth("/api/media", &token, "image/png", bytes.clone())
        .await
        .unwrap();
    let upload: MediaUploadResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(upload.media_type, "image");
    assert!(upload.url.starts_with("/uploads/"));
    assert!(upload.url.ends_with(".png"));

    let response = server.get(&upload.url).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().to_vec(), bytes);
}

#[tokio::test]
async fn test_media_upload_rejections() {
    let server = TestServer::start().await.unwrap();
    let (_, token) = registered(&server, "Uploader").await;

    let response = server
        .post_bytes_auth("/api/media", &token, "text/plain", b"hello".to_vec())
        .await
        .unwrap();
    let message = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(message, "Only image and video files are allowed");

    let response = server
        .post_bytes_auth("/api/media", &token, "image/png", Vec::new())
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let oversized = vec![0u8; TEST_MAX_FILE_SIZE_MB as usize * 1024 * 1024 + 1];
    let response = server
        .post_bytes_auth("/api/media", &token, "image/png", oversized)
        .await
        .unwrap();
    let message = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(message, format!("File too large (max {TEST_MAX_FILE_SIZE_MB} MB)"));
}
