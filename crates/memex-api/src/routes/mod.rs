//! Route definitions
//!
//! REST routes mounted under /api; health probes stay at the root.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, comments, communities, health, media, posts, users};
use crate::state::AppState;

/// Create the API router
///
/// `max_upload_bytes` caps the media upload body. Bodies up to twice the cap
/// reach the handler, which rejects anything over the cap with a 400; larger
/// bodies are cut off by the extractor with a 413.
pub fn create_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().nest("/api", api_routes(max_upload_bytes))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(post_routes())
        .merge(comment_routes())
        .merge(community_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .merge(media_routes(max_upload_bytes))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/auth/verify", post(auth::verify))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/:id", get(posts::get_post).delete(posts::delete_post))
        .route("/posts/:id/vote", post(posts::vote_post))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", post(comments::create_comment))
        .route("/comments/post/:post_id", get(comments::list_post_comments))
        .route(
            "/comments/:id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/comments/:id/vote", post(comments::vote_comment))
}

fn community_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/communities",
            get(communities::list_communities).post(communities::create_community),
        )
        .route("/communities/user/joined", get(communities::joined_communities))
        .route("/communities/:id", get(communities::get_community))
        .route("/communities/:id/join", post(communities::join_community))
        .route("/communities/:id/leave", post(communities::leave_community))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::search_users))
        .route("/users/:uid", get(users::get_user))
        .route("/users/:uid/posts", get(users::get_user_posts))
        .route("/users/:uid/comments", get(users::get_user_comments))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(admin::stats))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:uid/ban", post(admin::ban_user))
        .route("/admin/users/:uid/unban", post(admin::unban_user))
        .route("/admin/users/:uid/make-admin", post(admin::make_admin))
        .route("/admin/users/:uid/remove-admin", post(admin::remove_admin))
        .route("/admin/posts/:id", delete(admin::delete_post))
        .route("/admin/posts/:id/feature", post(admin::feature_post))
        .route("/admin/posts/:id/unfeature", post(admin::unfeature_post))
}

fn media_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/media", post(media::upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes.saturating_mul(2)))
}
