//! Shared fixtures for service tests

#![allow(dead_code)]

use std::sync::Arc;

use memex_common::{JwtTokenVerifier, VerifiedIdentity};
use memex_core::{DocumentKey, DocumentStore, Post, UserProfile};
use memex_db::{LocalMediaHost, MemoryDocumentStore};
use memex_service::dto::{CreatePostRequest, RegisterRequest};
use memex_service::services::{PostService, UserService};
use memex_service::{ServiceContext, ServiceContextBuilder};

pub fn context(store: Arc<MemoryDocumentStore>) -> ServiceContext {
    context_with_attempts(store, 5)
}

pub fn context_with_attempts(store: Arc<MemoryDocumentStore>, attempts: u32) -> ServiceContext {
    ServiceContextBuilder::new()
        .store(store)
        .media_host(Arc::new(LocalMediaHost::new(
            std::env::temp_dir().join("memex-service-tests"),
            "/uploads",
        )))
        .token_verifier(Arc::new(JwtTokenVerifier::new("service-test-secret", None, None)))
        .vote_max_attempts(attempts)
        .max_upload_bytes(1024)
        .build()
        .unwrap()
}

pub fn identity(uid: &str) -> VerifiedIdentity {
    VerifiedIdentity::new(uid)
        .with_email(format!("{uid}@example.com"))
        .with_name(uid.to_uppercase())
}

pub async fn register(ctx: &ServiceContext, uid: &str) -> VerifiedIdentity {
    let who = identity(uid);
    UserService::new(ctx)
        .register(&who, RegisterRequest::default())
        .await
        .unwrap();
    who
}

pub async fn create_post(ctx: &ServiceContext, author: &VerifiedIdentity, title: &str) -> String {
    PostService::new(ctx)
        .create(
            author,
            CreatePostRequest {
                title: title.to_string(),
                community: "memes".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .post_id
}

pub async fn profile(store: &MemoryDocumentStore, uid: &VerifiedIdentity) -> UserProfile {
    store
        .get(&DocumentKey::user(&uid.uid))
        .await
        .unwrap()
        .unwrap()
        .decode()
        .unwrap()
}

pub async fn post(store: &MemoryDocumentStore, id: &str) -> Post {
    store
        .get(&DocumentKey::post(id))
        .await
        .unwrap()
        .unwrap()
        .decode()
        .unwrap()
}
