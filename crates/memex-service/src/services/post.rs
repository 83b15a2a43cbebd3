//! Post service
//!
//! Feed listing, post detail, creation and deletion. Creation goes through the
//! `CreatePost` mutation plan so the author's karma moves in the same batch.

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use memex_common::VerifiedIdentity;
use memex_core::{
    BatchedMutation, Collection, Direction, Document, DocumentKey, DomainError, FieldUpdate, MutationPlan,
    Post, Query, RepoResult, ScoreAggregator, UserId, VoteCounters, WriteBatch,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;
use super::user::UserService;
use crate::dto::{
    CreatePostRequest, CreatedPostResponse, ListPostsQuery, MessageResponse, PageRequest,
    PaginationMeta, PostDetailResponse, PostListResponse, PostResponse, PostSort,
};

pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Non-deleted posts, optionally of one community, in feed order
    #[instrument(skip(self))]
    pub async fn list(&self, query: ListPostsQuery, page: PageRequest) -> ServiceResult<PostListResponse> {
        let (field, direction) = match PostSort::parse(query.sort.as_deref()) {
            PostSort::Hot => (Post::HOT_SCORE, Direction::Desc),
            PostSort::New => (Post::CREATED_AT, Direction::Desc),
            PostSort::Top => (VoteCounters::SCORE, Direction::Desc),
        };

        let mut store_query = Query::new(Collection::Posts).eq(Post::IS_DELETED, false);
        if let Some(community) = query.community.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            store_query = store_query.eq(Post::COMMUNITY, community);
        }
        let store_query = store_query.order_by(field, direction).page(page.page, page.limit);

        let posts = self.fetch(&store_query).await?;
        let posts = self.with_authors(posts).await?;
        Ok(PostListResponse {
            pagination: PaginationMeta::for_page(page, posts.len()),
            posts,
        })
    }

    /// Non-deleted posts of one author, newest first
    #[instrument(skip(self))]
    pub async fn list_by_author(&self, author_id: &UserId, page: PageRequest) -> ServiceResult<PostListResponse> {
        let store_query = Query::new(Collection::Posts)
            .eq(Post::AUTHOR_ID, author_id.as_str())
            .eq(Post::IS_DELETED, false)
            .order_by(Post::CREATED_AT, Direction::Desc)
            .page(page.page, page.limit);

        let posts: Vec<PostResponse> = self.fetch(&store_query).await?.into_iter().map(PostResponse::from).collect();
        Ok(PostListResponse {
            pagination: PaginationMeta::for_page(page, posts.len()),
            posts,
        })
    }

    /// One post with its author
    #[instrument(skip(self))]
    pub async fn get(&self, post_id: &str) -> ServiceResult<PostDetailResponse> {
        let post = self.require(post_id).await?;
        let post = self
            .with_authors(vec![post])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::internal("post lost while attaching author"))?;
        Ok(PostDetailResponse { post })
    }

    #[instrument(skip(self, identity, request), fields(uid = %identity.uid))]
    pub async fn create(
        &self,
        identity: &VerifiedIdentity,
        request: CreatePostRequest,
    ) -> ServiceResult<CreatedPostResponse> {
        request.validate()?;
        let title = request.title.trim();
        let community = request.community.trim();
        if title.is_empty() || community.is_empty() {
            return Err(ServiceError::validation("Title and community are required"));
        }

        PermissionService::new(self.ctx)
            .require_active_profile(&identity.uid)
            .await?;

        let now = Utc::now();
        let mut post = Post::new(
            self.ctx.generate_id().to_string(),
            identity.uid.clone(),
            title.to_string(),
            community.to_string(),
            now,
        );
        post.content = request.content.trim().to_string();
        post.tags = request
            .tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(ToString::to_string)
            .collect();
        if let Some(url) = request.media_url.filter(|url| !url.trim().is_empty()) {
            post.media_url = url;
            post.media_type = request
                .media_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default();
        }
        post.hot_score = ScoreAggregator::hot_score(post.counters.score, now, now);

        let batch = MutationPlan::CreatePost(&post).into_batch()?;
        BatchedMutation::new(self.ctx.store()).commit_or_abort(batch).await?;

        info!(post_id = %post.id, community = %post.community, "Post created");

        Ok(CreatedPostResponse {
            message: "Post created successfully".to_string(),
            post_id: post.id,
        })
    }

    /// Soft delete by the author or an admin
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn delete(&self, identity: &VerifiedIdentity, post_id: &str) -> ServiceResult<MessageResponse> {
        let post = self.require(post_id).await?;
        PermissionService::new(self.ctx)
            .require_author_or_admin(identity, &post.author_id, "delete this post")
            .await?;

        self.update_flag(post_id, Post::IS_DELETED, true).await?;
        info!(post_id, "Post deleted");
        Ok(MessageResponse::new("Post deleted successfully"))
    }

    /// Soft delete without an ownership check; callers enforce admin rights
    pub async fn mark_deleted(&self, post_id: &str) -> ServiceResult<()> {
        self.require(post_id).await?;
        self.update_flag(post_id, Post::IS_DELETED, true).await
    }

    pub async fn set_featured(&self, post_id: &str, featured: bool) -> ServiceResult<()> {
        self.require(post_id).await?;
        self.update_flag(post_id, Post::IS_FEATURED, featured).await?;
        info!(post_id, featured, "Post feature flag changed");
        Ok(())
    }

    pub async fn find(&self, post_id: &str) -> ServiceResult<Option<Post>> {
        match self.ctx.store().get(&DocumentKey::post(post_id)).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn require(&self, post_id: &str) -> ServiceResult<Post> {
        self.find(post_id)
            .await?
            .ok_or_else(|| DomainError::subject_not_found("Post", post_id).into())
    }

    async fn update_flag(&self, post_id: &str, field: &str, value: bool) -> ServiceResult<()> {
        let batch = WriteBatch::new().update(
            DocumentKey::post(post_id),
            vec![
                (field.to_string(), FieldUpdate::set(value)),
                (Post::UPDATED_AT.to_string(), FieldUpdate::set(Utc::now().timestamp_millis())),
            ],
        );
        BatchedMutation::new(self.ctx.store()).commit_or_abort(batch).await?;
        Ok(())
    }

    async fn fetch(&self, query: &Query) -> ServiceResult<Vec<Post>> {
        let documents = self.ctx.store().query(query).await?;
        Ok(documents.iter().map(Document::decode).collect::<RepoResult<Vec<Post>>>()?)
    }

    async fn with_authors(&self, posts: Vec<Post>) -> ServiceResult<Vec<PostResponse>> {
        let authors = UserService::new(self.ctx)
            .author_summaries(posts.iter().map(|p| &p.author_id))
            .await?;
        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned();
                PostResponse {
                    author,
                    ..PostResponse::from(post)
                }
            })
            .collect())
    }
}
