//! Mutation plans: which related documents each creation flow touches
//!
//! The table in [`MutationPlan::effects`] is the single place that knows which
//! denormalized counters a mutation must keep consistent. Services build a plan and
//! commit [`MutationPlan::into_batch`]; they never hand-assemble counter updates.

use serde_json::Value;

use super::batch::{FieldUpdate, WriteBatch};
use crate::entities::{Comment, Community, Membership, Post, UserProfile};
use crate::error::DomainResult;
use crate::value_objects::{DocumentKey, UserId};

/// Change to a counter or list on a document related to the primary write
#[derive(Debug, Clone, PartialEq)]
pub struct CounterEffect {
    pub key: DocumentKey,
    pub field: &'static str,
    pub update: FieldUpdate,
}

impl CounterEffect {
    fn increment(key: DocumentKey, field: &'static str, by: i64) -> Self {
        Self {
            key,
            field,
            update: FieldUpdate::Increment(by),
        }
    }

    fn array_union(key: DocumentKey, field: &'static str, value: &str) -> Self {
        Self {
            key,
            field,
            update: FieldUpdate::ArrayUnion(Value::from(value)),
        }
    }

    fn array_remove(key: DocumentKey, field: &'static str, value: &str) -> Self {
        Self {
            key,
            field,
            update: FieldUpdate::ArrayRemove(Value::from(value)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum MutationPlan<'a> {
    CreatePost(&'a Post),
    CreateComment(&'a Comment),
    CreateCommunity {
        community: &'a Community,
        membership: &'a Membership,
    },
    JoinCommunity(&'a Membership),
    LeaveCommunity {
        community_id: &'a str,
        user_id: &'a UserId,
    },
}

impl MutationPlan<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatePost(_) => "create_post",
            Self::CreateComment(_) => "create_comment",
            Self::CreateCommunity { .. } => "create_community",
            Self::JoinCommunity(_) => "join_community",
            Self::LeaveCommunity { .. } => "leave_community",
        }
    }

    /// Secondary effects of the mutation
    pub fn effects(&self) -> Vec<CounterEffect> {
        match *self {
            Self::CreatePost(post) => vec![CounterEffect::increment(
                DocumentKey::user(&post.author_id),
                UserProfile::KARMA,
                1,
            )],
            Self::CreateComment(comment) => {
                let mut effects = vec![CounterEffect::increment(
                    DocumentKey::post(comment.post_id.as_str()),
                    Post::COMMENT_COUNT,
                    1,
                )];
                if let Some(parent_id) = &comment.parent_id {
                    effects.push(CounterEffect::increment(
                        DocumentKey::comment(parent_id.as_str()),
                        Comment::REPLY_COUNT,
                        1,
                    ));
                }
                effects.push(CounterEffect::increment(
                    DocumentKey::user(&comment.author_id),
                    UserProfile::KARMA,
                    1,
                ));
                effects
            }
            Self::CreateCommunity { community, .. } => vec![CounterEffect::array_union(
                DocumentKey::user(&community.creator_id),
                UserProfile::JOINED_COMMUNITIES,
                &community.id,
            )],
            Self::JoinCommunity(membership) => vec![
                CounterEffect::increment(
                    DocumentKey::community(membership.community_id.as_str()),
                    Community::MEMBER_COUNT,
                    1,
                ),
                CounterEffect::array_union(
                    DocumentKey::user(&membership.user_id),
                    UserProfile::JOINED_COMMUNITIES,
                    &membership.community_id,
                ),
            ],
            Self::LeaveCommunity {
                community_id,
                user_id,
            } => vec![
                CounterEffect::increment(DocumentKey::community(community_id), Community::MEMBER_COUNT, -1),
                CounterEffect::array_remove(DocumentKey::user(user_id), UserProfile::JOINED_COMMUNITIES, community_id),
            ],
        }
    }

    /// Primary write(s) followed by every effect, as one batch
    pub fn into_batch(self) -> DomainResult<WriteBatch> {
        let batch = match self {
            Self::CreatePost(post) => WriteBatch::new().create(DocumentKey::post(post.id.as_str()), post)?,
            Self::CreateComment(comment) => {
                WriteBatch::new().create(DocumentKey::comment(comment.id.as_str()), comment)?
            }
            Self::CreateCommunity {
                community,
                membership,
            } => WriteBatch::new()
                .create(DocumentKey::community(community.id.as_str()), community)?
                .create(
                    DocumentKey::membership(&membership.community_id, &membership.user_id),
                    membership,
                )?,
            Self::JoinCommunity(membership) => WriteBatch::new().create(
                DocumentKey::membership(&membership.community_id, &membership.user_id),
                membership,
            )?,
            Self::LeaveCommunity {
                community_id,
                user_id,
            } => WriteBatch::new().delete_existing(DocumentKey::membership(community_id, user_id)),
        };

        Ok(self.effects().into_iter().fold(batch, |batch, effect| {
            batch.update(effect.key, vec![(effect.field.to_string(), effect.update)])
        }))
    }
}
