//! Comment service
//!
//! Threaded comment listing plus create, edit and soft delete. Creation uses the
//! `CreateComment` plan: the post's comment count, the parent's reply count and the
//! author's karma change in the same batch as the comment itself.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use memex_common::VerifiedIdentity;
use memex_core::{
    BatchedMutation, Collection, Comment, Direction, Document, DocumentKey, DomainError,
    FieldUpdate, MutationPlan, Post, Query, RepoResult, UserId, WriteBatch,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;
use super::post::PostService;
use super::user::UserService;
use crate::dto::{
    CommentListResponse, CommentResponse, CreateCommentRequest, CreatedCommentResponse,
    MessageResponse, PageRequest, PaginationMeta, UpdateCommentRequest,
};

/// Title shown for comments whose post no longer exists
pub const DELETED_POST_TITLE: &str = "Deleted Post";

pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// One page of a post's non-deleted comments, newest first, arranged as a tree.
    ///
    /// Pagination applies to the flat list. Replies whose parent is not on the page
    /// are left out.
    #[instrument(skip(self))]
    pub async fn list_for_post(&self, post_id: &str, page: PageRequest) -> ServiceResult<CommentListResponse> {
        let store_query = Query::new(Collection::Comments)
            .eq(Comment::POST_ID, post_id)
            .eq(Comment::IS_DELETED, false)
            .order_by(Comment::CREATED_AT, Direction::Desc)
            .page(page.page, page.limit);

        let comments = self.fetch(&store_query).await?;
        let returned = comments.len();

        let authors = UserService::new(self.ctx)
            .author_summaries(comments.iter().map(|c| &c.author_id))
            .await?;
        let nodes = comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned();
                CommentResponse {
                    author,
                    replies: Some(Vec::new()),
                    ..CommentResponse::from(comment)
                }
            })
            .collect();

        Ok(CommentListResponse {
            comments: build_tree(nodes),
            pagination: PaginationMeta::for_page(page, returned),
        })
    }

    /// Non-deleted comments of one author, newest first, each with its post's title
    #[instrument(skip(self))]
    pub async fn list_by_author(&self, author_id: &UserId, page: PageRequest) -> ServiceResult<CommentListResponse> {
        let store_query = Query::new(Collection::Comments)
            .eq(Comment::AUTHOR_ID, author_id.as_str())
            .eq(Comment::IS_DELETED, false)
            .order_by(Comment::CREATED_AT, Direction::Desc)
            .page(page.page, page.limit);

        let comments = self.fetch(&store_query).await?;

        let post_ids: Vec<&str> = comments
            .iter()
            .map(|c| c.post_id.as_str())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let keys: Vec<DocumentKey> = post_ids.iter().map(|id| DocumentKey::post(*id)).collect();
        let mut titles = HashMap::new();
        for doc in self.ctx.store().get_many(&keys).await?.into_iter().flatten() {
            let post: Post = doc.decode()?;
            titles.insert(post.id, post.title);
        }

        let comments: Vec<CommentResponse> = comments
            .into_iter()
            .map(|comment| {
                let post_title = titles
                    .get(&comment.post_id)
                    .cloned()
                    .unwrap_or_else(|| DELETED_POST_TITLE.to_string());
                CommentResponse {
                    post_title: Some(post_title),
                    ..CommentResponse::from(comment)
                }
            })
            .collect();

        Ok(CommentListResponse {
            pagination: PaginationMeta::for_page(page, comments.len()),
            comments,
        })
    }

    #[instrument(skip(self, identity, request), fields(uid = %identity.uid))]
    pub async fn create(
        &self,
        identity: &VerifiedIdentity,
        request: CreateCommentRequest,
    ) -> ServiceResult<CreatedCommentResponse> {
        request.validate()?;
        let post_id = request.post_id.trim();
        let content = request.content.trim();
        if post_id.is_empty() || content.is_empty() {
            return Err(ServiceError::validation("Post ID and content are required"));
        }

        PermissionService::new(self.ctx)
            .require_active_profile(&identity.uid)
            .await?;
        PostService::new(self.ctx).require(post_id).await?;

        let parent_id = request
            .parent_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToString::to_string);
        if let Some(parent_id) = &parent_id {
            let parent = self
                .find(parent_id)
                .await?
                .ok_or_else(|| DomainError::ParentCommentNotFound(parent_id.clone()))?;
            if parent.post_id != post_id {
                return Err(ServiceError::validation("Parent comment belongs to another post"));
            }
        }

        let comment = Comment::new(
            self.ctx.generate_id().to_string(),
            post_id,
            identity.uid.clone(),
            content.to_string(),
            parent_id,
            Utc::now(),
        );

        let batch = MutationPlan::CreateComment(&comment).into_batch()?;
        BatchedMutation::new(self.ctx.store()).commit_or_abort(batch).await?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, reply = comment.is_reply(), "Comment created");

        Ok(CreatedCommentResponse {
            message: "Comment created successfully".to_string(),
            comment_id: comment.id,
        })
    }

    /// Only the author may edit
    #[instrument(skip(self, identity, request), fields(uid = %identity.uid))]
    pub async fn edit(
        &self,
        identity: &VerifiedIdentity,
        comment_id: &str,
        request: UpdateCommentRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;
        let content = request.content.trim();
        if content.is_empty() {
            return Err(ServiceError::validation("Content is required"));
        }

        let comment = self.require(comment_id).await?;
        if !comment.is_authored_by(&identity.uid) {
            return Err(DomainError::NotAuthorized("edit this comment").into());
        }

        let batch = WriteBatch::new().update(
            DocumentKey::comment(comment_id),
            vec![
                (Comment::CONTENT.to_string(), FieldUpdate::set(content)),
                (Comment::IS_EDITED.to_string(), FieldUpdate::set(true)),
                (Comment::UPDATED_AT.to_string(), FieldUpdate::set(Utc::now().timestamp_millis())),
            ],
        );
        BatchedMutation::new(self.ctx.store()).commit_or_abort(batch).await?;

        info!(comment_id, "Comment edited");
        Ok(MessageResponse::new("Comment updated successfully"))
    }

    /// Soft delete by the author or an admin
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn delete(&self, identity: &VerifiedIdentity, comment_id: &str) -> ServiceResult<MessageResponse> {
        let comment = self.require(comment_id).await?;
        PermissionService::new(self.ctx)
            .require_author_or_admin(identity, &comment.author_id, "delete this comment")
            .await?;

        let batch = WriteBatch::new().update(
            DocumentKey::comment(comment_id),
            vec![
                (Comment::IS_DELETED.to_string(), FieldUpdate::set(true)),
                (Comment::UPDATED_AT.to_string(), FieldUpdate::set(Utc::now().timestamp_millis())),
            ],
        );
        BatchedMutation::new(self.ctx.store()).commit_or_abort(batch).await?;

        info!(comment_id, "Comment deleted");
        Ok(MessageResponse::new("Comment deleted successfully"))
    }

    pub async fn find(&self, comment_id: &str) -> ServiceResult<Option<Comment>> {
        match self.ctx.store().get(&DocumentKey::comment(comment_id)).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn require(&self, comment_id: &str) -> ServiceResult<Comment> {
        self.find(comment_id)
            .await?
            .ok_or_else(|| DomainError::subject_not_found("Comment", comment_id).into())
    }

    async fn fetch(&self, query: &Query) -> ServiceResult<Vec<Comment>> {
        let documents = self.ctx.store().query(query).await?;
        Ok(documents.iter().map(Document::decode).collect::<RepoResult<Vec<Comment>>>()?)
    }
}

/// Arrange a flat page into a forest, keeping the page order at every level
fn build_tree(nodes: Vec<CommentResponse>) -> Vec<CommentResponse> {
    let index: HashMap<String, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        match &node.parent_id {
            None => roots.push(i),
            Some(parent) => {
                if let Some(&p) = index.get(parent) {
                    children.entry(p).or_default().push(i);
                }
            }
        }
    }

    let mut slots: Vec<Option<CommentResponse>> = nodes.into_iter().map(Some).collect();
    roots
        .into_iter()
        .filter_map(|i| attach(i, &mut slots, &children))
        .collect()
}

/// Each slot is taken once, so malformed parent links cannot loop
fn attach(
    i: usize,
    slots: &mut [Option<CommentResponse>],
    children: &HashMap<usize, Vec<usize>>,
) -> Option<CommentResponse> {
    let mut node = slots.get_mut(i)?.take()?;
    let replies: Vec<CommentResponse> = children
        .get(&i)
        .map(|kids| kids.iter().filter_map(|&k| attach(k, slots, children)).collect())
        .unwrap_or_default();
    node.replies = Some(replies);
    Some(node)
}
