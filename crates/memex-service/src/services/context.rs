//! Service context - dependency container for services
//!
//! Holds the document store, the media host, the token verifier and the
//! id generator, plus the few tunables services read at request time.

use std::sync::Arc;

use memex_common::auth::TokenVerifier;
use memex_core::traits::{DocumentStore, MediaHost};
use memex_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Default attempts of the optimistic vote cycle
pub const DEFAULT_VOTE_MAX_ATTEMPTS: u32 = 5;

/// Default upload limit (50 MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Request-time tunables
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    pub vote_max_attempts: u32,
    pub max_upload_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            vote_max_attempts: DEFAULT_VOTE_MAX_ATTEMPTS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Service context containing all dependencies
///
/// This is the dependency container passed to every service. It provides:
/// - the document store all entities live in
/// - the media host uploads are handed to
/// - the verifier for identity-provider tokens
/// - the snowflake generator for post, comment and community ids
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn DocumentStore>,
    media_host: Arc<dyn MediaHost>,
    token_verifier: Arc<dyn TokenVerifier>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    settings: ServiceSettings,
}

impl ServiceContext {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        media_host: Arc<dyn MediaHost>,
        token_verifier: Arc<dyn TokenVerifier>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store,
            media_host,
            token_verifier,
            snowflake_generator,
            settings,
        }
    }

    // === Ports ===

    /// Get the document store
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Get the media host
    pub fn media_host(&self) -> &dyn MediaHost {
        self.media_host.as_ref()
    }

    /// Get the token verifier
    pub fn token_verifier(&self) -> &dyn TokenVerifier {
        self.token_verifier.as_ref()
    }

    // === Ids and settings ===

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"dyn DocumentStore")
            .field("media_host", &"dyn MediaHost")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn DocumentStore>>,
    media_host: Option<Arc<dyn MediaHost>>,
    token_verifier: Option<Arc<dyn TokenVerifier>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    settings: ServiceSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn media_host(mut self, host: Arc<dyn MediaHost>) -> Self {
        self.media_host = Some(host);
        self
    }

    pub fn token_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.token_verifier = Some(verifier);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn vote_max_attempts(mut self, attempts: u32) -> Self {
        self.settings.vote_max_attempts = attempts;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.settings.max_upload_bytes = bytes;
        self
    }

    /// Build the context; the id generator defaults to worker 0
    pub fn build(self) -> ServiceResult<ServiceContext> {
        if self.settings.vote_max_attempts == 0 {
            return Err(ServiceError::validation("vote_max_attempts must be at least 1"));
        }
        Ok(ServiceContext::new(
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.media_host
                .ok_or_else(|| ServiceError::validation("media_host is required"))?,
            self.token_verifier
                .ok_or_else(|| ServiceError::validation("token_verifier is required"))?,
            self.snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::new(0))),
            self.settings,
        ))
    }
}
